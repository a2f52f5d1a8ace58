use ideciclo::config::DataConfig;
use ideciclo::error::AppError;
use ideciclo::survey::{
    City, CityId, Form, RepositoryError, Segment, SurveyDataset, SurveyRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Insertion-ordered store; fetch order is the order forms were saved.
#[derive(Default, Clone)]
pub(crate) struct InMemorySurveyRepository {
    cities: Arc<Mutex<Vec<City>>>,
    segments: Arc<Mutex<Vec<Segment>>>,
    forms: Arc<Mutex<Vec<Form>>>,
}

impl SurveyRepository for InMemorySurveyRepository {
    fn cities(&self) -> Result<Vec<City>, RepositoryError> {
        let guard = self.cities.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn city(&self, id: &CityId) -> Result<Option<City>, RepositoryError> {
        let guard = self.cities.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|city| &city.id == id).cloned())
    }

    fn segments_for_city(&self, id: &CityId) -> Result<Vec<Segment>, RepositoryError> {
        let guard = self.segments.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|segment| &segment.city_id == id)
            .cloned()
            .collect())
    }

    fn forms_for_city(&self, id: &CityId) -> Result<Vec<Form>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|form| &form.city_id == id)
            .cloned()
            .collect())
    }

    fn save_city(&self, city: City) -> Result<(), RepositoryError> {
        let mut guard = self.cities.lock().expect("repository mutex poisoned");
        match guard.iter().position(|existing| existing.id == city.id) {
            Some(index) => guard[index] = city,
            None => guard.push(city),
        }
        Ok(())
    }

    fn save_segments(&self, segments: Vec<Segment>) -> Result<(), RepositoryError> {
        let mut guard = self.segments.lock().expect("repository mutex poisoned");
        for segment in segments {
            match guard.iter().position(|existing| existing.id == segment.id) {
                Some(index) => guard[index] = segment,
                None => guard.push(segment),
            }
        }
        Ok(())
    }

    fn save_form(&self, form: Form) -> Result<(), RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        match guard.iter().position(|existing| existing.id == form.id) {
            Some(index) => guard[index] = form,
            None => guard.push(form),
        }
        Ok(())
    }
}

/// Repository preloaded with the configured CSV exports, empty when none are set.
pub(crate) fn seeded_repository(data: &DataConfig) -> Result<InMemorySurveyRepository, AppError> {
    let repository = InMemorySurveyRepository::default();
    let Some((cities, segments, forms)) = data.seed_files() else {
        return Ok(repository);
    };

    let dataset = SurveyDataset::from_paths(cities, segments, forms)?;
    info!(
        cities = dataset.cities.len(),
        segments = dataset.segments.len(),
        forms = dataset.forms.len(),
        "seeding survey repository"
    );
    dataset.seed(&repository)?;
    Ok(repository)
}
