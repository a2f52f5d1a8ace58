use super::domain::{City, CityId, Form, Segment};

/// Storage abstraction over surveyed cities, their segments and forms.
///
/// Implementations return data already validated; scoring performs no schema
/// checks of its own and picks the first form of a segment itself.
pub trait SurveyRepository: Send + Sync {
    fn cities(&self) -> Result<Vec<City>, RepositoryError>;
    fn city(&self, id: &CityId) -> Result<Option<City>, RepositoryError>;
    fn segments_for_city(&self, id: &CityId) -> Result<Vec<Segment>, RepositoryError>;
    fn forms_for_city(&self, id: &CityId) -> Result<Vec<Form>, RepositoryError>;
    fn save_city(&self, city: City) -> Result<(), RepositoryError>;
    fn save_segments(&self, segments: Vec<Segment>) -> Result<(), RepositoryError>;
    /// Stores a form, replacing one with the same id. Retakes of an evaluated
    /// segment are kept; `forms_for_city` returns them in the order they were saved.
    fn save_form(&self, form: Form) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
