//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, Sse},
    Json,
};
use chrono::Datelike;
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    DatasetInfoDto, DatasetListResponse, ForecastQuery, HealthResponse, HolidayCountQuery,
    HolidaysQuery, JobStatusResponse, PatternsQuery, TrendsQuery, UploadDatasetRequest,
    UploadDatasetResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{CaseId, DatasetId, HolidayRangeCount, HolidayYearData};
use crate::db::services as db_services;
use crate::services::{self, holidays};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the
/// repository is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Dataset CRUD
// =============================================================================

/// GET /v1/datasets
///
/// List all datasets in the store.
pub async fn list_datasets(State(state): State<AppState>) -> HandlerResult<DatasetListResponse> {
    let datasets = db_services::list_datasets(state.repository.as_ref()).await?;

    let dataset_dtos: Vec<DatasetInfoDto> = datasets.into_iter().map(Into::into).collect();
    let total = dataset_dtos.len();

    Ok(Json(DatasetListResponse {
        datasets: dataset_dtos,
        total,
    }))
}

/// POST /v1/datasets
///
/// Upload a new dataset asynchronously. Returns a job ID for tracking
/// progress.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Json(request): Json<UploadDatasetRequest>,
) -> Result<(axum::http::StatusCode, Json<UploadDatasetResponse>), AppError> {
    // Convert JSON values to strings for the service layer
    let dataset_json_str = serde_json::to_string(&request.dataset_json)
        .map_err(|e| AppError::BadRequest(format!("Invalid dataset JSON: {}", e)))?;

    // Create a job for tracking progress
    let job_id = state.job_tracker.create_job(&request.name);
    let response_job_id = job_id.clone();

    // Spawn background task to process the dataset
    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let dataset_name = request.name.clone();
    let populate_aggregates = request.populate_aggregates;

    tokio::spawn(async move {
        let _ = crate::services::dataset_processor::process_dataset_async(
            job_id,
            tracker,
            repo,
            dataset_name,
            dataset_json_str,
            populate_aggregates,
        )
        .await;
    });

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(UploadDatasetResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Dataset upload started. Track progress at /v1/jobs/{}/logs",
                response_job_id
            ),
        }),
    ))
}

// =============================================================================
// Analytics Endpoints
// =============================================================================

/// GET /v1/datasets/{dataset_id}/cases/{case_id}/timeline
///
/// Get timeline bracket layout for a case.
pub async fn get_case_timeline(
    State(_state): State<AppState>,
    Path((dataset_id, case_id)): Path<(i64, i64)>,
) -> HandlerResult<crate::api::CaseTimelineData> {
    let data =
        services::get_case_timeline_data(DatasetId::new(dataset_id), CaseId::new(case_id))
            .await
            .map_err(AppError::Internal)?;

    Ok(Json(data))
}

/// GET /v1/datasets/{dataset_id}/cases/{case_id}/financials
///
/// Get the financial projection/comparison dataset for a case.
pub async fn get_case_financials(
    State(state): State<AppState>,
    Path((dataset_id, case_id)): Path<(i64, i64)>,
) -> HandlerResult<crate::api::CaseFinancialsData> {
    let data = services::get_case_financials_data(
        DatasetId::new(dataset_id),
        CaseId::new(case_id),
        &state.facility,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(data))
}

/// GET /v1/datasets/{dataset_id}/forecast
///
/// Get the full-day forecast for a surgeon and date.
pub async fn get_full_day_forecast(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<ForecastQuery>,
) -> HandlerResult<crate::api::FullDayForecast> {
    let data = services::get_full_day_forecast(
        DatasetId::new(dataset_id),
        &query.surgeon_id,
        query.date,
        &state.facility,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(data))
}

/// GET /v1/datasets/{dataset_id}/flag-patterns
///
/// Get detected flag patterns for a dataset.
pub async fn get_flag_patterns(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<PatternsQuery>,
) -> HandlerResult<crate::api::FlagPatternData> {
    let data = services::get_flag_pattern_data(
        DatasetId::new(dataset_id),
        query.start,
        query.end,
        &state.facility,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(data))
}

/// GET /v1/datasets/{dataset_id}/trends
///
/// Get weekly volume trends and the divergence assessment.
pub async fn get_volume_trends(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<TrendsQuery>,
) -> HandlerResult<crate::api::VolumeTrendsData> {
    let weeks = query
        .weeks
        .unwrap_or(crate::services::trends::DEFAULT_TREND_WEEKS);

    let data = services::get_volume_trends_data(DatasetId::new(dataset_id), weeks, &state.facility)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(data))
}

// =============================================================================
// Calendar Endpoints
// =============================================================================

/// GET /v1/calendar/holidays
///
/// List US federal holidays for a year.
pub async fn get_holidays(
    Query(query): Query<HolidaysQuery>,
) -> HandlerResult<HolidayYearData> {
    let year = query
        .year
        .unwrap_or_else(|| chrono::Utc::now().date_naive().year());

    Ok(Json(HolidayYearData {
        year,
        holidays: holidays::holidays_for_year(year),
    }))
}

/// GET /v1/calendar/holidays/count
///
/// Count holidays observed within an inclusive date range.
pub async fn get_holiday_count(
    Query(query): Query<HolidayCountQuery>,
) -> HandlerResult<HolidayRangeCount> {
    if query.start > query.end {
        return Err(AppError::BadRequest(
            "start must not be after end".to_string(),
        ));
    }

    Ok(Json(HolidayRangeCount {
        start: query.start,
        end: query.end,
        count: holidays::count_in_range(query.start, query.end),
    }))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /v1/jobs/{job_id}
///
/// Get the current status and logs of a background job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify job exists
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Get current logs
            let logs = tracker.get_logs(&job_id);

            // Send new logs since last check
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            // Check if job is complete
            if let Some(job) = tracker.get_job(&job_id) {
                if !job.is_running() {
                    // Send final status event. Serde serialization keeps
                    // status values lowercase ("completed", "failed").
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
