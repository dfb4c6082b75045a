use crate::api::CostItem;
use serde::{Deserialize, Serialize};

// =========================================================
// Case financials types
// =========================================================

/// Which benchmark level supplied a projected figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkSource {
    Surgeon,
    Facility,
    Scheduled,
}

/// Inputs for a per-case financial projection.
///
/// Benchmark medians are optional; the projection falls back from surgeon
/// level to facility level to the scheduled duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub scheduled_duration_minutes: f64,
    pub surgeon_median_duration_minutes: Option<f64>,
    pub facility_median_duration_minutes: Option<f64>,
    pub surgeon_median_reimbursement: Option<f64>,
    pub facility_median_reimbursement: Option<f64>,
    /// Facility OR rate in dollars per hour
    pub or_hourly_rate: f64,
    pub cost_items: Vec<CostItem>,
}

/// Projected financial outcome for a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseProjection {
    pub expected_duration_minutes: f64,
    pub duration_source: BenchmarkSource,
    /// Projected reimbursement; `None` when no benchmark carries one
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_source: Option<BenchmarkSource>,
    /// OR time cost: hourly rate applied to the expected duration
    pub or_cost: f64,
    /// Sum of itemized cost entries
    pub item_cost: f64,
    pub total_cost: f64,
    pub profit: Option<f64>,
    pub margin_percent: Option<f64>,
}

/// Realized figures once a case completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActualOutcome {
    pub revenue: Option<f64>,
    pub cost: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// Projected-vs-actual diff for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDelta {
    pub projected: f64,
    pub actual: f64,
    pub delta: f64,
    /// `None` when the projected denominator is zero
    pub percent_delta: Option<f64>,
}

/// Projected-vs-actual comparison across revenue, cost, and profit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseComparison {
    pub revenue: Option<MetricDelta>,
    pub cost: Option<MetricDelta>,
    pub profit: Option<MetricDelta>,
}

/// Tone hint for dashboard metric cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricTone {
    Positive,
    Negative,
    Neutral,
}

/// A headline metric for dashboard cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroMetric {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub tone: MetricTone,
}

/// One category slice of the cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdownEntry {
    pub category: String,
    pub amount: f64,
    pub percent_of_total: f64,
}

/// Per-category cost breakdown including OR time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub entries: Vec<CostBreakdownEntry>,
    pub total: f64,
}

/// Confidence tier for a financial comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Moderate,
    Low,
}

/// Data-quality grade backing a financial view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub confidence: ConfidenceTier,
    pub score: u8,
    pub benchmark_case_count: u32,
    pub notes: Vec<String>,
}

/// Complete financial dataset for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFinancialsData {
    pub case_id: i64,
    pub original_case_id: String,
    pub procedure_name: String,
    pub completed: bool,
    pub projection: CaseProjection,
    pub actual: Option<ActualOutcome>,
    pub comparison: Option<CaseComparison>,
    pub hero_metrics: Vec<HeroMetric>,
    pub cost_breakdown: CostBreakdown,
    pub data_quality: DataQualityReport,
    pub or_hourly_rate: f64,
}

/// Route function name constant for case financials
pub const GET_CASE_FINANCIALS: &str = "get_case_financials_data";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_inputs_clone() {
        let inputs = ProjectionInputs {
            scheduled_duration_minutes: 90.0,
            surgeon_median_duration_minutes: Some(85.0),
            facility_median_duration_minutes: Some(95.0),
            surgeon_median_reimbursement: Some(12_000.0),
            facility_median_reimbursement: None,
            or_hourly_rate: 2400.0,
            cost_items: vec![],
        };
        let cloned = inputs.clone();
        assert_eq!(cloned.scheduled_duration_minutes, 90.0);
        assert_eq!(cloned.surgeon_median_duration_minutes, Some(85.0));
    }

    #[test]
    fn test_metric_delta_debug() {
        let delta = MetricDelta {
            projected: 100.0,
            actual: 110.0,
            delta: 10.0,
            percent_delta: Some(10.0),
        };
        let debug_str = format!("{:?}", delta);
        assert!(debug_str.contains("MetricDelta"));
    }

    #[test]
    fn test_benchmark_source_serialization() {
        let json = serde_json::to_string(&BenchmarkSource::Surgeon).unwrap();
        assert_eq!(json, "\"surgeon\"");
        let json = serde_json::to_string(&BenchmarkSource::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
    }

    #[test]
    fn test_confidence_tier_serialization() {
        let json = serde_json::to_string(&ConfidenceTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_CASE_FINANCIALS, "get_case_financials_data");
    }
}
