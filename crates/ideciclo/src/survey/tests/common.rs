use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::survey::domain::{
    AnswerCode, City, CityId, Criterion, Form, FormId, NetworkTier, Responses, Segment, SegmentId,
};
use crate::survey::repository::{RepositoryError, SurveyRepository};
use crate::survey::{survey_router, IdecicloService};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn recife() -> City {
    City {
        id: CityId("recife".to_string()),
        name: "Recife".to_string(),
        state: Some("PE".to_string()),
    }
}

pub(super) fn olinda() -> City {
    City {
        id: CityId("olinda".to_string()),
        name: "Olinda".to_string(),
        state: Some("PE".to_string()),
    }
}

pub(super) fn segment(id: &str, length: f64, classification: Option<NetworkTier>) -> Segment {
    Segment {
        id: SegmentId(id.to_string()),
        city_id: recife().id,
        name: None,
        length,
        segment_type: "CICLOFAIXA".to_string(),
        classification,
    }
}

pub(super) fn legacy_segment(id: &str, length: f64, segment_type: &str) -> Segment {
    Segment {
        segment_type: segment_type.to_string(),
        ..segment(id, length, None)
    }
}

pub(super) fn in_city(mut segment: Segment, city: &City) -> Segment {
    segment.city_id = city.id.clone();
    segment
}

pub(super) fn form_with(segment_id: &str, answers: &[(Criterion, AnswerCode)]) -> Form {
    Form {
        id: FormId(format!("form-{segment_id}")),
        segment_id: SegmentId(segment_id.to_string()),
        city_id: recife().id,
        responses: Some(answers.iter().copied().collect()),
    }
}

/// Form answering every scored criterion with the same code.
pub(super) fn uniform_form(segment_id: &str, answer: AnswerCode) -> Form {
    let answers: Vec<_> = Criterion::ALL
        .into_iter()
        .map(|criterion| (criterion, answer))
        .collect();
    form_with(segment_id, &answers)
}

pub(super) fn raw_form(segment_id: &str, responses: Responses) -> Form {
    Form {
        responses: Some(responses),
        ..form_with(segment_id, &[])
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) cities: Arc<Mutex<Vec<City>>>,
    pub(super) segments: Arc<Mutex<Vec<Segment>>>,
    pub(super) forms: Arc<Mutex<Vec<Form>>>,
}

impl SurveyRepository for MemoryRepository {
    fn cities(&self) -> Result<Vec<City>, RepositoryError> {
        Ok(self.cities.lock().expect("repository mutex poisoned").clone())
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
        self.cities
            .lock()
            .expect("repository mutex poisoned")
            .push(city);
        Ok(())
    }

    fn save_segments(&self, segments: Vec<Segment>) -> Result<(), RepositoryError> {
        self.segments
            .lock()
            .expect("repository mutex poisoned")
            .extend(segments);
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

pub(super) struct UnavailableRepository;

impl SurveyRepository for UnavailableRepository {
    fn cities(&self) -> Result<Vec<City>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn city(&self, _id: &CityId) -> Result<Option<City>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn segments_for_city(&self, _id: &CityId) -> Result<Vec<Segment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn forms_for_city(&self, _id: &CityId) -> Result<Vec<Form>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_city(&self, _city: City) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_segments(&self, _segments: Vec<Segment>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_form(&self, _form: Form) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Recife with a fully rated structural network and an unevaluated local street;
/// Olinda with a single local segment rated `B`.
pub(super) fn seeded_repository() -> Arc<MemoryRepository> {
    let repository = Arc::new(MemoryRepository::default());
    repository.save_city(recife()).expect("save recife");
    repository.save_city(olinda()).expect("save olinda");

    repository
        .save_segments(vec![
            segment("rec-1", 4.0, Some(NetworkTier::Estrutural)),
            segment("rec-2", 2.0, Some(NetworkTier::Alimentadora)),
            segment("rec-3", 1.0, Some(NetworkTier::Local)),
            segment("rec-4", 3.0, Some(NetworkTier::Local)),
            in_city(segment("oli-1", 1.5, Some(NetworkTier::Local)), &olinda()),
        ])
        .expect("save segments");

    for form in [
        uniform_form("rec-1", AnswerCode::A),
        uniform_form("rec-2", AnswerCode::A),
        uniform_form("rec-3", AnswerCode::A),
    ] {
        repository.save_form(form).expect("save form");
    }
    let mut olinda_form = uniform_form("oli-1", AnswerCode::B);
    olinda_form.city_id = olinda().id;
    repository.save_form(olinda_form).expect("save form");

    repository
}

pub(super) fn build_service() -> (IdecicloService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = seeded_repository();
    (IdecicloService::new(repository.clone()), repository)
}

pub(super) fn survey_router_with_service(
    service: IdecicloService<MemoryRepository>,
) -> axum::Router {
    survey_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
