use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::survey::router::city_score_handler;
use crate::survey::IdecicloService;

#[tokio::test]
async fn city_route_returns_score_view() {
    let (service, _) = build_service();
    let router = survey_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/cities/recife/ideciclo")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("city_id"), Some(&json!("recife")));
    assert_eq!(payload.get("classification"), Some(&json!("A")));
    assert_eq!(payload.get("description"), Some(&json!("Excelente")));
    assert_eq!(
        payload
            .get("networks")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(3)
    );
}

#[tokio::test]
async fn city_handler_returns_not_found_for_unknown_city() {
    let (service, _) = build_service();

    let response = city_score_handler::<MemoryRepository>(
        State(Arc::new(service)),
        axum::extract::Path("caruaru".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("city_id"), Some(&json!("caruaru")));
}

#[tokio::test]
async fn city_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(IdecicloService::new(Arc::new(UnavailableRepository)));

    let response = city_score_handler::<UnavailableRepository>(
        State(service),
        axum::extract::Path("recife".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn ranking_route_lists_positions() {
    let (service, _) = build_service();
    let router = survey_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/ranking")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("ranking array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].get("city_id"), Some(&json!("recife")));
    assert_eq!(entries[0].get("position"), Some(&json!(1)));
    assert_eq!(entries[1].get("city_id"), Some(&json!("olinda")));
}

#[tokio::test]
async fn compute_route_scores_posted_survey() {
    let (service, _) = build_service();
    let router = survey_router_with_service(service);
    let body = json!({
        "segments": [
            { "id": "s-1", "length": 10.0, "type": "CICLOVIA", "classification": "estrutural" },
            { "id": "s-2", "length": 3.0, "type": "CICLOFAIXA" }
        ],
        "forms": [
            { "id": "f-1", "segment_id": "s-1", "responses": { "pavement_type": "A", "shading_coverage": "A", "notes": "ok" } }
        ],
        "include_breakdown": true
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/ideciclo")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let index = payload
        .get("index")
        .and_then(Value::as_f64)
        .expect("index present");
    assert_close(index, 0.59);
    assert_eq!(payload.get("classification"), Some(&json!("C")));
    assert_eq!(payload.get("description"), Some(&json!("Regular")));
    let breakdown = payload.get("breakdown").expect("breakdown included");
    assert_eq!(
        breakdown.get("unevaluated_segments"),
        Some(&json!(["s-2"]))
    );
}

#[tokio::test]
async fn compute_route_omits_breakdown_by_default() {
    let (service, _) = build_service();
    let router = survey_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/ideciclo")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{}"))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("index"), Some(&json!(0.0)));
    assert_eq!(payload.get("classification"), Some(&json!("D")));
    assert!(payload.get("breakdown").is_none());
}
