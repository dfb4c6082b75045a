//! Full-day surgeon forecast.
//!
//! Projects a surgeon's day from benchmark medians: expected duration per
//! case, total OR time against the scheduled allotment, and aggregate
//! revenue/cost figures.

use crate::api::{CaseRecord, DatasetId, ForecastCase, FullDayForecast, ProjectionInputs};
use crate::db::models::BenchmarkPair;
use crate::db::get_repository;
use crate::models::FacilityConfig;
use crate::services::financials::compute_projection;
use chrono::NaiveDate;

/// Build a full-day forecast from already-fetched cases and benchmark rows.
pub fn build_full_day_forecast(
    surgeon_id: &str,
    date: NaiveDate,
    cases: &[CaseRecord],
    benchmarks: &[crate::api::BenchmarkRow],
    facility: &FacilityConfig,
) -> FullDayForecast {
    let mut day_cases: Vec<&CaseRecord> = cases.iter().collect();
    day_cases.sort_by_key(|case| case.scheduled_start);

    let mut forecast_cases = Vec::with_capacity(day_cases.len());
    let mut total_scheduled_minutes = 0.0;
    let mut total_expected_minutes = 0.0;
    let mut projected_revenue: Option<f64> = None;
    let mut projected_or_cost = 0.0;
    let mut projected_total_cost = 0.0;

    for case in day_cases {
        let pair = BenchmarkPair::resolve(benchmarks, &case.surgeon_id, &case.procedure_name);
        let projection = compute_projection(&ProjectionInputs {
            scheduled_duration_minutes: case.scheduled_duration_minutes,
            surgeon_median_duration_minutes: pair
                .surgeon
                .as_ref()
                .and_then(|b| b.median_duration_minutes),
            facility_median_duration_minutes: pair
                .facility
                .as_ref()
                .and_then(|b| b.median_duration_minutes),
            surgeon_median_reimbursement: pair
                .surgeon
                .as_ref()
                .and_then(|b| b.median_reimbursement),
            facility_median_reimbursement: pair
                .facility
                .as_ref()
                .and_then(|b| b.median_reimbursement),
            or_hourly_rate: facility.or_hourly_rate,
            cost_items: case.cost_items.clone(),
        });

        total_scheduled_minutes += case.scheduled_duration_minutes;
        total_expected_minutes += projection.expected_duration_minutes;
        projected_or_cost += projection.or_cost;
        projected_total_cost += projection.total_cost;
        if let Some(revenue) = projection.revenue {
            projected_revenue = Some(projected_revenue.unwrap_or(0.0) + revenue);
        }

        forecast_cases.push(ForecastCase {
            case_id: case.id.map(|id| id.value()).unwrap_or(0),
            original_case_id: case.original_case_id.clone(),
            procedure_name: case.procedure_name.clone(),
            scheduled_start: case.scheduled_start,
            scheduled_duration_minutes: case.scheduled_duration_minutes,
            expected_duration_minutes: projection.expected_duration_minutes,
            duration_source: projection.duration_source,
            projected_revenue: projection.revenue,
        });
    }

    let overrun_minutes = (total_expected_minutes - total_scheduled_minutes).max(0.0);
    let projected_profit = projected_revenue.map(|revenue| revenue - projected_total_cost);

    FullDayForecast {
        surgeon_id: surgeon_id.to_string(),
        date,
        case_count: forecast_cases.len(),
        cases: forecast_cases,
        total_scheduled_minutes,
        total_expected_minutes,
        overrun_minutes,
        projected_revenue,
        projected_or_cost,
        projected_profit,
    }
}

/// Get the full-day forecast for one surgeon and date from the repository.
pub async fn get_full_day_forecast(
    dataset_id: DatasetId,
    surgeon_id: &str,
    date: NaiveDate,
    facility: &FacilityConfig,
) -> Result<FullDayForecast, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;

    let cases = repo
        .fetch_cases_for_surgeon_date(dataset_id, surgeon_id, date)
        .await
        .map_err(|e| format!("Failed to fetch cases: {}", e))?;

    let benchmarks = repo
        .fetch_benchmark_rows(dataset_id)
        .await
        .map_err(|e| format!("Failed to fetch benchmarks: {}", e))?;

    Ok(build_full_day_forecast(
        surgeon_id, date, &cases, &benchmarks, facility,
    ))
}
