use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Holiday calendar types
// =========================================================

/// A US federal holiday occurrence for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Official holiday name
    pub name: String,
    /// Nominal calendar date
    pub date: NaiveDate,
    /// Observed date after the weekend shift rule (Saturday observes the
    /// preceding Friday, Sunday the following Monday)
    pub observed: NaiveDate,
}

/// Holiday list for one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayYearData {
    pub year: i32,
    pub holidays: Vec<Holiday>,
}

/// Holiday count over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRangeCount {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
}

/// Route function name constants for calendar queries
pub const GET_HOLIDAYS: &str = "get_holidays";
pub const GET_HOLIDAY_COUNT: &str = "get_holiday_count";
