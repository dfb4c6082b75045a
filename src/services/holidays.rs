//! US federal holiday calendar engine.
//!
//! Computes the 11 federal holidays for a calendar year from fixed-date and
//! nth-weekday rules, applies the federal observed-date shift (Saturday
//! observes the preceding Friday, Sunday the following Monday), and answers
//! membership and range-count queries against observed dates.
//!
//! All functions panic only for years outside chrono's representable range,
//! which is a caller error rather than a handled condition.

use crate::api::Holiday;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("year within supported calendar range")
}

/// Nth occurrence of a weekday within a month (n is 1-based).
fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
    let first = ymd(year, month, 1);
    let offset = (7 + weekday.num_days_from_monday() as i64
        - first.weekday().num_days_from_monday() as i64)
        % 7;
    first + Duration::days(offset + 7 * (n as i64 - 1))
}

/// Last occurrence of a weekday within a month.
fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    let last = if month == 12 {
        ymd(year + 1, 1, 1) - Duration::days(1)
    } else {
        ymd(year, month + 1, 1) - Duration::days(1)
    };
    let offset = (7 + last.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64)
        % 7;
    last - Duration::days(offset)
}

/// Federal observed-date rule: Saturday shifts to the preceding Friday,
/// Sunday to the following Monday, weekdays are unshifted.
fn observed_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn holiday(name: &str, date: NaiveDate) -> Holiday {
    Holiday {
        name: name.to_string(),
        date,
        observed: observed_date(date),
    }
}

/// All 11 US federal holidays for a calendar year, chronologically sorted
/// by nominal date.
///
/// Each year's list is computed independently; a New Year's Day whose
/// observed date falls in the previous December still belongs to the
/// requested year's list.
pub fn holidays_for_year(year: i32) -> Vec<Holiday> {
    vec![
        holiday("New Year's Day", ymd(year, 1, 1)),
        holiday(
            "Martin Luther King Jr. Day",
            nth_weekday_of_month(year, 1, Weekday::Mon, 3),
        ),
        holiday(
            "Presidents' Day",
            nth_weekday_of_month(year, 2, Weekday::Mon, 3),
        ),
        holiday("Memorial Day", last_weekday_of_month(year, 5, Weekday::Mon)),
        holiday("Juneteenth National Independence Day", ymd(year, 6, 19)),
        holiday("Independence Day", ymd(year, 7, 4)),
        holiday("Labor Day", nth_weekday_of_month(year, 9, Weekday::Mon, 1)),
        holiday(
            "Columbus Day",
            nth_weekday_of_month(year, 10, Weekday::Mon, 2),
        ),
        holiday("Veterans Day", ymd(year, 11, 11)),
        holiday(
            "Thanksgiving Day",
            nth_weekday_of_month(year, 11, Weekday::Thu, 4),
        ),
        holiday("Christmas Day", ymd(year, 12, 25)),
    ]
}

/// Whether a date is a holiday, by *observed* date.
///
/// The following year's list is also checked so a New Year's Day observed
/// on December 31 classifies the preceding Friday correctly.
pub fn is_holiday(date: NaiveDate) -> bool {
    holidays_for_year(date.year())
        .iter()
        .chain(holidays_for_year(date.year() + 1).iter())
        .any(|h| h.observed == date)
}

/// Number of holidays observed within an inclusive date range.
///
/// Correct across year boundaries; an inverted range counts zero.
pub fn count_in_range(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }

    (start.year()..=end.year() + 1)
        .flat_map(holidays_for_year)
        .filter(|h| h.observed >= start && h.observed <= end)
        .count()
}
