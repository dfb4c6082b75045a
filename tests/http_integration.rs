//! HTTP API tests driving the axum router directly.
#![cfg(feature = "http-server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use orsi_rust::db::repositories::LocalRepository;
use orsi_rust::http::{create_router, AppState};
use orsi_rust::models::FacilityConfig;
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> axum::Router {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn orsi_rust::db::FullRepository>;
    create_router(AppState::new(repo, FacilityConfig::default()))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_list_datasets_empty() {
    let response = test_router()
        .oneshot(Request::get("/v1/datasets").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_upload_dataset_returns_job() {
    let payload = serde_json::json!({
        "name": "upload-test",
        "dataset_json": {
            "cases": [{
                "original_case_id": "c1",
                "surgeon_id": "dr-a",
                "room_id": "or-1",
                "procedure_name": "tka",
                "scheduled_start": "2026-03-02T08:00:00Z",
                "scheduled_duration_minutes": 90.0
            }]
        }
    });

    let response = test_router()
        .oneshot(
            Request::post("/v1/datasets")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert!(json["job_id"].as_str().is_some());
}

#[tokio::test]
async fn test_holidays_endpoint() {
    let response = test_router()
        .oneshot(
            Request::get("/v1/calendar/holidays?year=2026")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2026);
    assert_eq!(json["holidays"].as_array().unwrap().len(), 11);
    // Independence Day 2026 is observed on Friday July 3
    let fourth = json["holidays"]
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["name"] == "Independence Day")
        .unwrap();
    assert_eq!(fourth["observed"], "2026-07-03");
}

#[tokio::test]
async fn test_holiday_count_endpoint() {
    let response = test_router()
        .oneshot(
            Request::get("/v1/calendar/holidays/count?start=2025-11-01&end=2025-11-30")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn test_holiday_count_rejects_inverted_range() {
    let response = test_router()
        .oneshot(
            Request::get("/v1/calendar/holidays/count?start=2025-12-01&end=2025-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_job_is_404() {
    let response = test_router()
        .oneshot(
            Request::get("/v1/jobs/not-a-job")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
