//! Per-case financial analytics.
//!
//! Builds cost/revenue projections from benchmark medians, compares them
//! against realized outcomes once a case completes, and derives the
//! dashboard views (hero metrics, cost breakdown, data-quality grade).
//! All computation here is pure; rows are fetched once by the service
//! entry point and passed through.

use crate::api::{
    ActualOutcome, BenchmarkSource, CaseComparison, CaseFinancialsData, CaseId, CaseProjection,
    CaseRecord, ConfidenceTier, CostBreakdown, CostBreakdownEntry, CostItem, DataQualityReport,
    DatasetId, HeroMetric, MetricDelta, MetricTone, ProjectionInputs,
};
use crate::db::get_repository;
use crate::models::FacilityConfig;
use std::collections::BTreeMap;

/// Cost breakdown category used for OR time, distinct from itemized entries.
const OR_TIME_CATEGORY: &str = "or_time";

/// Compute a per-case financial projection.
///
/// Duration precedence: surgeon median, then facility median, then the
/// scheduled duration. Reimbursement follows the same chain but has no
/// scheduled fallback, so `revenue` may be `None`. Itemized costs are the
/// authoritative non-OR cost source regardless of benchmark availability.
pub fn compute_projection(inputs: &ProjectionInputs) -> CaseProjection {
    let (expected_duration_minutes, duration_source) = match (
        inputs.surgeon_median_duration_minutes,
        inputs.facility_median_duration_minutes,
    ) {
        (Some(minutes), _) => (minutes, BenchmarkSource::Surgeon),
        (None, Some(minutes)) => (minutes, BenchmarkSource::Facility),
        (None, None) => (inputs.scheduled_duration_minutes, BenchmarkSource::Scheduled),
    };

    let (revenue, revenue_source) = match (
        inputs.surgeon_median_reimbursement,
        inputs.facility_median_reimbursement,
    ) {
        (Some(amount), _) => (Some(amount), Some(BenchmarkSource::Surgeon)),
        (None, Some(amount)) => (Some(amount), Some(BenchmarkSource::Facility)),
        (None, None) => (None, None),
    };

    let expected_hours = qtty::Hours::new(expected_duration_minutes / 60.0);
    let or_cost = inputs.or_hourly_rate * expected_hours.value();
    let item_cost: f64 = inputs.cost_items.iter().map(|item| item.amount).sum();
    let total_cost = or_cost + item_cost;

    let profit = revenue.map(|r| r - total_cost);
    let margin_percent = match (revenue, profit) {
        (Some(r), Some(p)) if r != 0.0 => Some(p / r * 100.0),
        _ => None,
    };

    CaseProjection {
        expected_duration_minutes,
        duration_source,
        revenue,
        revenue_source,
        or_cost,
        item_cost,
        total_cost,
        profit,
        margin_percent,
    }
}

fn metric_delta(projected: f64, actual: f64) -> MetricDelta {
    let delta = actual - projected;
    let percent_delta = if projected == 0.0 {
        None
    } else {
        Some(delta / projected * 100.0)
    };
    MetricDelta {
        projected,
        actual,
        delta,
        percent_delta,
    }
}

/// Diff a projection against realized figures.
///
/// Each metric is compared only when both sides are present; percent deltas
/// are `None` when the projected denominator is zero.
pub fn compute_comparison(projection: &CaseProjection, actual: &ActualOutcome) -> CaseComparison {
    let revenue = match (projection.revenue, actual.revenue) {
        (Some(projected), Some(realized)) => Some(metric_delta(projected, realized)),
        _ => None,
    };

    let cost = actual
        .cost
        .map(|realized| metric_delta(projection.total_cost, realized));

    let actual_profit = match (actual.revenue, actual.cost) {
        (Some(r), Some(c)) => Some(r - c),
        _ => None,
    };
    let profit = match (projection.profit, actual_profit) {
        (Some(projected), Some(realized)) => Some(metric_delta(projected, realized)),
        _ => None,
    };

    CaseComparison {
        revenue,
        cost,
        profit,
    }
}

fn tone_for_amount(amount: f64) -> MetricTone {
    if amount > 0.0 {
        MetricTone::Positive
    } else if amount < 0.0 {
        MetricTone::Negative
    } else {
        MetricTone::Neutral
    }
}

/// Build the dashboard hero metrics from computed values only.
pub fn build_hero_metrics(
    projection: &CaseProjection,
    comparison: Option<&CaseComparison>,
) -> Vec<HeroMetric> {
    let mut metrics = vec![HeroMetric {
        label: "Expected duration".to_string(),
        value: projection.expected_duration_minutes,
        unit: "min".to_string(),
        tone: MetricTone::Neutral,
    }];

    if let Some(revenue) = projection.revenue {
        metrics.push(HeroMetric {
            label: "Projected revenue".to_string(),
            value: revenue,
            unit: "$".to_string(),
            tone: MetricTone::Neutral,
        });
    }

    metrics.push(HeroMetric {
        label: "Projected cost".to_string(),
        value: projection.total_cost,
        unit: "$".to_string(),
        tone: MetricTone::Neutral,
    });

    if let Some(profit) = projection.profit {
        metrics.push(HeroMetric {
            label: "Projected profit".to_string(),
            value: profit,
            unit: "$".to_string(),
            tone: tone_for_amount(profit),
        });
    }

    if let Some(margin) = projection.margin_percent {
        metrics.push(HeroMetric {
            label: "Projected margin".to_string(),
            value: margin,
            unit: "%".to_string(),
            tone: tone_for_amount(margin),
        });
    }

    if let Some(delta) = comparison.and_then(|c| c.profit.as_ref()) {
        metrics.push(HeroMetric {
            label: "Profit vs projection".to_string(),
            value: delta.delta,
            unit: "$".to_string(),
            tone: tone_for_amount(delta.delta),
        });
    }

    metrics
}

/// Aggregate itemized costs by category and add the OR time slice.
pub fn build_cost_breakdown(projection: &CaseProjection, cost_items: &[CostItem]) -> CostBreakdown {
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    for item in cost_items {
        *by_category.entry(item.category.clone()).or_insert(0.0) += item.amount;
    }
    if projection.or_cost > 0.0 {
        *by_category.entry(OR_TIME_CATEGORY.to_string()).or_insert(0.0) += projection.or_cost;
    }

    let total: f64 = by_category.values().sum();
    let mut entries: Vec<CostBreakdownEntry> = by_category
        .into_iter()
        .map(|(category, amount)| CostBreakdownEntry {
            category,
            amount,
            percent_of_total: if total == 0.0 {
                0.0
            } else {
                amount / total * 100.0
            },
        })
        .collect();
    entries.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    CostBreakdown { entries, total }
}

/// Grade the confidence behind a financial view.
///
/// One point each for: case completed, realized revenue and cost present,
/// at least 5 benchmark cases, at least 20 benchmark cases. 4 points grades
/// high, 2-3 moderate, otherwise low.
pub fn assess_data_quality(
    completed: bool,
    actual: &ActualOutcome,
    benchmark_case_count: u32,
) -> DataQualityReport {
    let mut score: u8 = 0;
    let mut notes = Vec::new();

    if completed {
        score += 1;
    } else {
        notes.push("case not yet completed; projection only".to_string());
    }

    if actual.revenue.is_some() && actual.cost.is_some() {
        score += 1;
    } else {
        notes.push("realized revenue or cost not yet recorded".to_string());
    }

    if benchmark_case_count >= 5 {
        score += 1;
    } else {
        notes.push(format!(
            "only {} benchmark cases back this projection",
            benchmark_case_count
        ));
    }
    if benchmark_case_count >= 20 {
        score += 1;
    }

    let confidence = match score {
        4 => ConfidenceTier::High,
        2 | 3 => ConfidenceTier::Moderate,
        _ => ConfidenceTier::Low,
    };

    DataQualityReport {
        confidence,
        score,
        benchmark_case_count,
        notes,
    }
}

fn actual_outcome(case: &CaseRecord) -> ActualOutcome {
    ActualOutcome {
        revenue: case.actual_revenue,
        cost: case.actual_cost,
        duration_minutes: case.actual_duration_minutes,
    }
}

/// Assemble the complete financial dataset for one case.
pub fn compute_case_financials(
    case: &CaseRecord,
    surgeon_benchmark: Option<&crate::api::BenchmarkRow>,
    facility_benchmark: Option<&crate::api::BenchmarkRow>,
    facility: &FacilityConfig,
) -> CaseFinancialsData {
    let inputs = ProjectionInputs {
        scheduled_duration_minutes: case.scheduled_duration_minutes,
        surgeon_median_duration_minutes: surgeon_benchmark
            .and_then(|b| b.median_duration_minutes),
        facility_median_duration_minutes: facility_benchmark
            .and_then(|b| b.median_duration_minutes),
        surgeon_median_reimbursement: surgeon_benchmark.and_then(|b| b.median_reimbursement),
        facility_median_reimbursement: facility_benchmark.and_then(|b| b.median_reimbursement),
        or_hourly_rate: facility.or_hourly_rate,
        cost_items: case.cost_items.clone(),
    };

    let projection = compute_projection(&inputs);
    let actual = actual_outcome(case);
    let has_actuals = actual.revenue.is_some() || actual.cost.is_some();
    let comparison = if case.completed && has_actuals {
        Some(compute_comparison(&projection, &actual))
    } else {
        None
    };

    // The benchmark behind the chosen duration source carries the
    // confidence-relevant case count.
    let benchmark_case_count = match projection.duration_source {
        BenchmarkSource::Surgeon => surgeon_benchmark.map(|b| b.case_count).unwrap_or(0),
        BenchmarkSource::Facility => facility_benchmark.map(|b| b.case_count).unwrap_or(0),
        BenchmarkSource::Scheduled => 0,
    };

    let hero_metrics = build_hero_metrics(&projection, comparison.as_ref());
    let cost_breakdown = build_cost_breakdown(&projection, &case.cost_items);
    let data_quality = assess_data_quality(case.completed, &actual, benchmark_case_count);

    CaseFinancialsData {
        case_id: case.id.map(|id| id.value()).unwrap_or(0),
        original_case_id: case.original_case_id.clone(),
        procedure_name: case.procedure_name.clone(),
        completed: case.completed,
        projection,
        actual: if has_actuals { Some(actual) } else { None },
        comparison,
        hero_metrics,
        cost_breakdown,
        data_quality,
        or_hourly_rate: facility.or_hourly_rate,
    }
}

/// Get the financial dataset for one case from the repository.
pub async fn get_case_financials_data(
    dataset_id: DatasetId,
    case_id: CaseId,
    facility: &FacilityConfig,
) -> Result<CaseFinancialsData, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;

    let case = repo
        .fetch_case(dataset_id, case_id)
        .await
        .map_err(|e| format!("Failed to fetch case: {}", e))?;

    let benchmarks = repo
        .fetch_benchmarks(dataset_id, &case.surgeon_id, &case.procedure_name)
        .await
        .map_err(|e| format!("Failed to fetch benchmarks: {}", e))?;

    Ok(compute_case_financials(
        &case,
        benchmarks.surgeon.as_ref(),
        benchmarks.facility.as_ref(),
        facility,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> ProjectionInputs {
        ProjectionInputs {
            scheduled_duration_minutes: 120.0,
            surgeon_median_duration_minutes: None,
            facility_median_duration_minutes: None,
            surgeon_median_reimbursement: None,
            facility_median_reimbursement: None,
            or_hourly_rate: 2400.0,
            cost_items: vec![],
        }
    }

    fn cost_item(category: &str, amount: f64) -> CostItem {
        CostItem {
            category: category.to_string(),
            description: None,
            amount,
        }
    }

    #[test]
    fn test_projection_surgeon_precedence() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(90.0);
        inputs.facility_median_duration_minutes = Some(150.0);

        let projection = compute_projection(&inputs);
        assert_eq!(projection.expected_duration_minutes, 90.0);
        assert_eq!(projection.duration_source, BenchmarkSource::Surgeon);
    }

    #[test]
    fn test_projection_facility_fallback() {
        let mut inputs = base_inputs();
        inputs.facility_median_duration_minutes = Some(150.0);

        let projection = compute_projection(&inputs);
        assert_eq!(projection.expected_duration_minutes, 150.0);
        assert_eq!(projection.duration_source, BenchmarkSource::Facility);
    }

    #[test]
    fn test_projection_scheduled_fallback() {
        let projection = compute_projection(&base_inputs());
        assert_eq!(projection.expected_duration_minutes, 120.0);
        assert_eq!(projection.duration_source, BenchmarkSource::Scheduled);
        assert_eq!(projection.revenue, None);
        assert_eq!(projection.profit, None);
        assert_eq!(projection.margin_percent, None);
    }

    #[test]
    fn test_projection_or_cost_from_hourly_rate() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(90.0);
        inputs.cost_items = vec![cost_item("implants", 3000.0), cost_item("supplies", 500.0)];

        let projection = compute_projection(&inputs);
        // 90 minutes at $2400/hour
        assert_eq!(projection.or_cost, 3600.0);
        assert_eq!(projection.item_cost, 3500.0);
        assert_eq!(projection.total_cost, 7100.0);
    }

    #[test]
    fn test_projection_profit_and_margin() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(60.0);
        inputs.surgeon_median_reimbursement = Some(12_000.0);
        inputs.cost_items = vec![cost_item("implants", 3600.0)];

        let projection = compute_projection(&inputs);
        // revenue 12000, cost 2400 + 3600 = 6000, profit 6000, margin 50%
        assert_eq!(projection.revenue, Some(12_000.0));
        assert_eq!(projection.profit, Some(6000.0));
        assert_eq!(projection.margin_percent, Some(50.0));
    }

    #[test]
    fn test_comparison_delta_round_trip() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(60.0);
        inputs.surgeon_median_reimbursement = Some(10_000.0);
        let projection = compute_projection(&inputs);

        let actual = ActualOutcome {
            revenue: Some(11_250.0),
            cost: Some(2000.0),
            duration_minutes: Some(70.0),
        };
        let comparison = compute_comparison(&projection, &actual);

        let revenue = comparison.revenue.unwrap();
        assert_eq!(revenue.actual - revenue.projected, revenue.delta);
        assert_eq!(revenue.delta, 1250.0);
        assert_eq!(revenue.percent_delta, Some(12.5));
    }

    #[test]
    fn test_comparison_zero_denominator() {
        let mut projection = compute_projection(&base_inputs());
        projection.total_cost = 0.0;

        let actual = ActualOutcome {
            revenue: None,
            cost: Some(500.0),
            duration_minutes: None,
        };
        let comparison = compute_comparison(&projection, &actual);
        let cost = comparison.cost.unwrap();
        assert_eq!(cost.delta, 500.0);
        assert_eq!(cost.percent_delta, None);
    }

    #[test]
    fn test_comparison_missing_actuals() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_reimbursement = Some(10_000.0);
        let projection = compute_projection(&inputs);

        let comparison = compute_comparison(&projection, &ActualOutcome::default());
        assert!(comparison.revenue.is_none());
        assert!(comparison.cost.is_none());
        assert!(comparison.profit.is_none());
    }

    #[test]
    fn test_hero_metrics_without_revenue() {
        let projection = compute_projection(&base_inputs());
        let metrics = build_hero_metrics(&projection, None);

        let labels: Vec<&str> = metrics.iter().map(|m| m.label.as_str()).collect();
        assert!(labels.contains(&"Expected duration"));
        assert!(labels.contains(&"Projected cost"));
        assert!(!labels.contains(&"Projected revenue"));
        assert!(!labels.contains(&"Projected profit"));
    }

    #[test]
    fn test_hero_metrics_tones() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(60.0);
        inputs.surgeon_median_reimbursement = Some(1000.0);
        let projection = compute_projection(&inputs);

        let metrics = build_hero_metrics(&projection, None);
        let profit = metrics
            .iter()
            .find(|m| m.label == "Projected profit")
            .unwrap();
        // revenue 1000 against 2400 of OR cost
        assert_eq!(profit.tone, MetricTone::Negative);
    }

    #[test]
    fn test_cost_breakdown_percentages() {
        let mut inputs = base_inputs();
        inputs.surgeon_median_duration_minutes = Some(60.0);
        inputs.cost_items = vec![
            cost_item("implants", 4800.0),
            cost_item("supplies", 2400.0),
            cost_item("implants", 2400.0),
        ];
        let projection = compute_projection(&inputs);
        let breakdown = build_cost_breakdown(&projection, &inputs.cost_items);

        // or_time 2400 + implants 7200 + supplies 2400 = 12000
        assert_eq!(breakdown.total, 12_000.0);
        assert_eq!(breakdown.entries[0].category, "implants");
        assert_eq!(breakdown.entries[0].amount, 7200.0);
        assert_eq!(breakdown.entries[0].percent_of_total, 60.0);
        let percent_sum: f64 = breakdown.entries.iter().map(|e| e.percent_of_total).sum();
        assert!((percent_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_breakdown_empty() {
        let mut projection = compute_projection(&base_inputs());
        projection.or_cost = 0.0;
        let breakdown = build_cost_breakdown(&projection, &[]);
        assert!(breakdown.entries.is_empty());
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_data_quality_tiers() {
        let full = ActualOutcome {
            revenue: Some(1.0),
            cost: Some(1.0),
            duration_minutes: None,
        };
        let report = assess_data_quality(true, &full, 25);
        assert_eq!(report.confidence, ConfidenceTier::High);
        assert_eq!(report.score, 4);
        assert!(report.notes.is_empty());

        let report = assess_data_quality(true, &full, 8);
        assert_eq!(report.confidence, ConfidenceTier::Moderate);

        let report = assess_data_quality(false, &ActualOutcome::default(), 0);
        assert_eq!(report.confidence, ConfidenceTier::Low);
        assert_eq!(report.notes.len(), 3);
    }
}
