//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::calendar::{Holiday, HolidayRangeCount, HolidayYearData};
pub use crate::routes::financials::ActualOutcome;
pub use crate::routes::financials::BenchmarkSource;
pub use crate::routes::financials::CaseComparison;
pub use crate::routes::financials::CaseFinancialsData;
pub use crate::routes::financials::CaseProjection;
pub use crate::routes::financials::ConfidenceTier;
pub use crate::routes::financials::CostBreakdown;
pub use crate::routes::financials::CostBreakdownEntry;
pub use crate::routes::financials::DataQualityReport;
pub use crate::routes::financials::HeroMetric;
pub use crate::routes::financials::MetricDelta;
pub use crate::routes::financials::MetricTone;
pub use crate::routes::financials::ProjectionInputs;
pub use crate::routes::forecast::{ForecastCase, FullDayForecast};
pub use crate::routes::landing::DatasetInfo;
pub use crate::routes::patterns::{
    DayOfWeekFlagRow, DetectedPattern, FlagPatternData, FlagRollup, PatternKind, PatternSeverity,
    RoomFlagCount, SurgeonFlagCount, WeeklyFlagRow,
};
pub use crate::routes::timeline::{BracketRange, CaseTimelineData, CaseTimelineItem};
pub use crate::routes::trends::{
    ChangeDirection, DirectionDelta, DivergenceAssessment, DivergenceCategory, VolumeTrendsData,
    WeeklyVolumePoint,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Dataset identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DatasetId(pub i64);

/// Surgical case identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(pub i64);

impl DatasetId {
    pub fn new(value: i64) -> Self {
        DatasetId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl CaseId {
    pub fn new(value: i64) -> Self {
        CaseId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DatasetId> for i64 {
    fn from(id: DatasetId) -> Self {
        id.0
    }
}

/// Flag categories tracked per case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagCategory {
    /// First Case On-Time Start misses
    Fcots,
    Timing,
    Turnover,
    Delay,
    Financial,
    Quality,
}

impl FlagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCategory::Fcots => "fcots",
            FlagCategory::Timing => "timing",
            FlagCategory::Turnover => "turnover",
            FlagCategory::Delay => "delay",
            FlagCategory::Financial => "financial",
            FlagCategory::Quality => "quality",
        }
    }
}

/// A recorded milestone on a case (e.g. anesthesia start, incision).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMilestone {
    pub label: String,
    pub recorded_at: DateTime<Utc>,
    /// Pairing tag for bracket visualization; milestones sharing a tag
    /// form one bracketed span
    #[serde(default)]
    pub pair_group: Option<String>,
    #[serde(default)]
    pub has_issue: bool,
}

/// An operational flag raised against a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFlag {
    pub category: FlagCategory,
    pub flagged_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// One itemized cost entry for a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
}

/// Individual surgical case record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Database ID for the case (optional on input, server-assigned)
    #[serde(default)]
    pub id: Option<CaseId>,
    /// Original ID from JSON (shown to user, required on input for new data)
    #[serde(default)]
    pub original_case_id: String,
    pub surgeon_id: String,
    pub room_id: String,
    pub procedure_name: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_duration_minutes: f64,
    #[serde(default)]
    pub actual_duration_minutes: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub milestones: Vec<CaseMilestone>,
    #[serde(default)]
    pub flags: Vec<CaseFlag>,
    #[serde(default)]
    pub cost_items: Vec<CostItem>,
    #[serde(default)]
    pub actual_revenue: Option<f64>,
    #[serde(default)]
    pub actual_cost: Option<f64>,
}

/// Historical benchmark medians for a procedure, at surgeon or facility
/// level (`surgeon_id` is `None` for facility-level rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRow {
    #[serde(default)]
    pub surgeon_id: Option<String>,
    pub procedure_name: String,
    #[serde(default)]
    pub median_duration_minutes: Option<f64>,
    #[serde(default)]
    pub median_reimbursement: Option<f64>,
    #[serde(default)]
    pub case_count: u32,
}

/// Pre-computed weekly OR utilization row supplied with the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUtilizationRow {
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    pub utilization_percent: f64,
}

/// Top-level case dataset with metadata, cases, and benchmark rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDataset {
    /// Database ID
    pub id: Option<i64>,
    /// Dataset name
    #[serde(default)]
    pub name: String,
    /// Facility identifier
    #[serde(default)]
    pub facility_id: String,
    /// SHA256 checksum of dataset data
    #[serde(default)]
    pub checksum: String,
    /// List of surgical cases
    pub cases: Vec<CaseRecord>,
    /// Benchmark medians by surgeon/procedure
    #[serde(default)]
    pub benchmarks: Vec<BenchmarkRow>,
    /// Pre-computed weekly utilization rows
    #[serde(default)]
    pub weekly_utilization: Vec<WeeklyUtilizationRow>,
}
