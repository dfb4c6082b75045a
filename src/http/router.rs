//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Dataset CRUD
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets", post(handlers::upload_dataset))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs))
        // Analytics endpoints
        .route(
            "/datasets/{dataset_id}/cases/{case_id}/timeline",
            get(handlers::get_case_timeline),
        )
        .route(
            "/datasets/{dataset_id}/cases/{case_id}/financials",
            get(handlers::get_case_financials),
        )
        .route(
            "/datasets/{dataset_id}/forecast",
            get(handlers::get_full_day_forecast),
        )
        .route(
            "/datasets/{dataset_id}/flag-patterns",
            get(handlers::get_flag_patterns),
        )
        .route(
            "/datasets/{dataset_id}/trends",
            get(handlers::get_volume_trends),
        )
        // Calendar endpoints
        .route("/calendar/holidays", get(handlers::get_holidays))
        .route("/calendar/holidays/count", get(handlers::get_holiday_count));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow large dataset payloads during uploads.
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::FacilityConfig;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo, FacilityConfig::default());
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
