use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CityId, Form, Segment};
use super::repository::SurveyRepository;
use super::scoring::{calculate_ideciclo_detailed, IdecicloBreakdown, IdecicloClassification};
use super::service::{IdecicloService, ScoringServiceError};

/// Router builder exposing city scores, the ranking and ad-hoc computation.
pub fn survey_router<R>(service: Arc<IdecicloService<R>>) -> Router
where
    R: SurveyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/cities/:city_id/ideciclo",
            get(city_score_handler::<R>),
        )
        .route("/api/v1/ranking", get(ranking_handler::<R>))
        .route("/api/v1/ideciclo", post(compute_handler))
        .with_state(service)
}

/// Ad-hoc scoring request for segments and forms not held in the repository.
#[derive(Debug, Deserialize)]
pub struct ComputeRequest {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub include_breakdown: bool,
}

#[derive(Debug, Serialize)]
pub struct ComputeResponse {
    pub index: f64,
    pub classification: IdecicloClassification,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<IdecicloBreakdown>,
}

pub(crate) async fn city_score_handler<R>(
    State(service): State<Arc<IdecicloService<R>>>,
    Path(city_id): Path<String>,
) -> Response
where
    R: SurveyRepository + 'static,
{
    let id = CityId(city_id);
    match service.city_score(&id) {
        Ok(score) => (StatusCode::OK, axum::Json(score.view())).into_response(),
        Err(ScoringServiceError::CityNotFound(_)) => {
            let payload = json!({
                "city_id": id.0,
                "error": "city not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ranking_handler<R>(State(service): State<Arc<IdecicloService<R>>>) -> Response
where
    R: SurveyRepository + 'static,
{
    match service.ranking() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn compute_handler(axum::Json(request): axum::Json<ComputeRequest>) -> Response {
    let ComputeRequest {
        segments,
        forms,
        include_breakdown,
    } = request;

    let breakdown = calculate_ideciclo_detailed(&segments, &forms);
    let response = ComputeResponse {
        index: breakdown.index,
        classification: breakdown.classification,
        description: breakdown.description(),
        breakdown: include_breakdown.then_some(breakdown),
    };

    (StatusCode::OK, axum::Json(response)).into_response()
}
