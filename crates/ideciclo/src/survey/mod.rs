//! Cycling infrastructure surveys and the IDECICLO city index.
//!
//! `scoring` holds the pure index computation; the remaining modules wire it to
//! storage, CSV exports and HTTP.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerCode, City, CityId, Criterion, Form, FormId, NetworkTier, Responses, Segment, SegmentId,
};
pub use import::{SurveyDataset, SurveyImportError, SurveyImporter};
pub use repository::{RepositoryError, SurveyRepository};
pub use router::{survey_router, ComputeRequest, ComputeResponse};
pub use scoring::{
    calculate_ideciclo, calculate_ideciclo_detailed, ideciclo_classification,
    ideciclo_description, IdecicloBreakdown, IdecicloClassification, NetworkBreakdown,
    SegmentScore,
};
pub use service::{CityScore, CityScoreView, IdecicloService, RankingEntry, ScoringServiceError};
