//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Most analytics DTOs are re-exported from the routes module since they
//! already derive Serialize/Deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Calendar
    Holiday, HolidayRangeCount, HolidayYearData,
    // Financials
    CaseComparison, CaseFinancialsData, CaseProjection, CostBreakdown, DataQualityReport,
    HeroMetric,
    // Forecast
    ForecastCase, FullDayForecast,
    // Landing
    DatasetInfo,
    // Patterns
    DetectedPattern, FlagPatternData, WeeklyFlagRow,
    // Timeline
    BracketRange, CaseTimelineData,
    // Trends
    DivergenceAssessment, VolumeTrendsData, WeeklyVolumePoint,
};

/// Request body for uploading a new case dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDatasetRequest {
    /// Name for the dataset
    pub name: String,
    /// Dataset JSON data (cases, benchmarks, weekly_utilization)
    pub dataset_json: serde_json::Value,
    /// Whether to populate aggregates after storing (default: true)
    #[serde(default = "default_true")]
    pub populate_aggregates: bool,
}

fn default_true() -> bool {
    true
}

/// Response for dataset upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDatasetResponse {
    /// Job ID for tracking the async processing
    pub job_id: String,
    /// Message about the operation
    pub message: String,
}

/// Job status response for async processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub job_id: String,
    /// Job status
    pub status: String,
    /// Log entries
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Result if completed
    pub result: Option<serde_json::Value>,
}

/// Query parameters for the volume trends endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendsQuery {
    /// Number of trailing weeks to analyze
    #[serde(default)]
    pub weeks: Option<usize>,
}

/// Query parameters for the flag patterns endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatternsQuery {
    /// Start of the analysis range (inclusive)
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// End of the analysis range (inclusive)
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Query parameters for the full-day forecast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub surgeon_id: String,
    pub date: NaiveDate,
}

/// Query parameters for the holiday list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HolidaysQuery {
    /// Calendar year; defaults to the current year
    #[serde(default)]
    pub year: Option<i32>,
}

/// Query parameters for the holiday count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCountQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Dataset list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    /// List of datasets
    pub datasets: Vec<DatasetInfoDto>,
    /// Total count
    pub total: usize,
}

/// Dataset info DTO for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfoDto {
    /// Dataset ID
    pub dataset_id: i64,
    /// Dataset name
    pub dataset_name: String,
    /// Facility identifier
    pub facility_id: String,
    /// Number of cases
    pub case_count: usize,
}

impl From<crate::api::DatasetInfo> for DatasetInfoDto {
    fn from(info: crate::api::DatasetInfo) -> Self {
        Self {
            dataset_id: info.dataset_id.value(),
            dataset_name: info.dataset_name,
            facility_id: info.facility_id,
            case_count: info.case_count,
        }
    }
}
