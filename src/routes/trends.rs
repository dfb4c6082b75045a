use crate::algorithms::TrendStats;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Volume trends + divergence types
// =========================================================

/// Weekly case volume point with optional pre-computed OR utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVolumePoint {
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    pub case_count: u32,
    pub utilization_percent: Option<f64>,
}

/// Direction of a metric between two periods, computed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Unchanged,
}

/// A direction plus the magnitude behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionDelta {
    pub direction: ChangeDirection,
    pub delta: f64,
}

/// The five narrative categories for volume-vs-utilization movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceCategory {
    EfficientGrowth,
    DecliningPipeline,
    SchedulingGap,
    Consolidation,
    Stable,
}

/// Classified volume-vs-utilization situation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergenceAssessment {
    pub category: DivergenceCategory,
    /// True only for the scheduling-gap category
    pub diverging: bool,
    pub headline: String,
    pub description: String,
}

/// Complete volume trends response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeTrendsData {
    pub points: Vec<WeeklyVolumePoint>,
    pub volume: TrendStats,
    pub utilization: Option<TrendStats>,
    pub divergence: Option<DivergenceAssessment>,
}

/// Route function name constant for volume trends
pub const GET_VOLUME_TRENDS: &str = "get_volume_trends_data";
