use super::financials::BenchmarkSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Full-day forecast types
// =========================================================

/// Per-case line of a surgeon's full-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCase {
    pub case_id: i64,
    pub original_case_id: String,
    pub procedure_name: String,
    pub scheduled_start: chrono::DateTime<chrono::Utc>,
    pub scheduled_duration_minutes: f64,
    pub expected_duration_minutes: f64,
    pub duration_source: BenchmarkSource,
    pub projected_revenue: Option<f64>,
}

/// Full-day forecast for one surgeon on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullDayForecast {
    pub surgeon_id: String,
    pub date: NaiveDate,
    pub cases: Vec<ForecastCase>,
    pub case_count: usize,
    pub total_scheduled_minutes: f64,
    pub total_expected_minutes: f64,
    /// Expected minutes beyond the scheduled allotment, floored at zero
    pub overrun_minutes: f64,
    /// Sum of per-case projected revenue; `None` when no case has one
    pub projected_revenue: Option<f64>,
    pub projected_or_cost: f64,
    pub projected_profit: Option<f64>,
}

/// Route function name constant for the full-day forecast
pub const GET_FULL_DAY_FORECAST: &str = "get_full_day_forecast";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_day_forecast_debug() {
        let forecast = FullDayForecast {
            surgeon_id: "dr-chen".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            cases: vec![],
            case_count: 0,
            total_scheduled_minutes: 0.0,
            total_expected_minutes: 0.0,
            overrun_minutes: 0.0,
            projected_revenue: None,
            projected_or_cost: 0.0,
            projected_profit: None,
        };
        let debug_str = format!("{:?}", forecast);
        assert!(debug_str.contains("FullDayForecast"));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_FULL_DAY_FORECAST, "get_full_day_forecast");
    }
}
