//! Dataset-level statistical computations.
//!
//! This module provides the statistical primitives shared across the
//! analytics services: medians, percentiles, and first-half/second-half
//! trend classification for weekly series.

use serde::{Deserialize, Serialize};

/// Absolute tolerance used when classifying a series as increasing or
/// decreasing. Second-half averages within this distance of the first-half
/// average classify as stable.
pub const TREND_TOLERANCE: f64 = 1.0;

/// Direction of a weekly series between its first and second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Result of classifying a series via the half-split rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStats {
    pub direction: TrendDirection,
    pub first_half_avg: f64,
    pub second_half_avg: f64,
    /// Percent change between halves. `None` when the first-half average
    /// is zero.
    pub percent_change: Option<f64>,
}

/// Arithmetic mean. Empty input yields `None`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard median over a numeric list. Empty input yields `None`, never
/// zero or NaN.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Percentile via linear interpolation between closest ranks.
///
/// `p` is expressed in [0, 100]. Empty input yields `None`.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = rank - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Percent change from `from` to `to`. `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Classify a series by splitting it into first and second halves and
/// comparing the half averages against [`TREND_TOLERANCE`].
///
/// The split point is `len / 2`; with an odd number of points the middle
/// point belongs to the second half. Series with fewer than 2 points are
/// stable by definition.
pub fn classify_trend(values: &[f64]) -> TrendStats {
    if values.len() < 2 {
        let avg = mean(values).unwrap_or(0.0);
        return TrendStats {
            direction: TrendDirection::Stable,
            first_half_avg: avg,
            second_half_avg: avg,
            percent_change: None,
        };
    }

    let split = values.len() / 2;
    let first_half_avg = mean(&values[..split]).unwrap_or(0.0);
    let second_half_avg = mean(&values[split..]).unwrap_or(0.0);

    let direction = if second_half_avg > first_half_avg + TREND_TOLERANCE {
        TrendDirection::Increasing
    } else if second_half_avg < first_half_avg - TREND_TOLERANCE {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    TrendStats {
        direction,
        first_half_avg,
        second_half_avg,
        percent_change: percent_change(first_half_avg, second_half_avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[1.0, 3.0, 5.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_median_single() {
        assert_eq!(median(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_percentile_bounds() {
        let values = vec![10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&values, 0.0), Some(10.0));
        assert_eq!(percentile(&values, 100.0), Some(40.0));
        assert_eq!(percentile(&values, 50.0), Some(25.0));
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(0.0, 5.0), None);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(10.0, 12.0), Some(20.0));
        assert_eq!(percent_change(10.0, 8.0), Some(-20.0));
    }

    #[test]
    fn test_classify_trend_increasing() {
        // First-half average 10, second-half average 12: beyond tolerance.
        let stats = classify_trend(&[10.0, 10.0, 12.0, 12.0]);
        assert_eq!(stats.direction, TrendDirection::Increasing);
        assert_eq!(stats.first_half_avg, 10.0);
        assert_eq!(stats.second_half_avg, 12.0);
        assert_eq!(stats.percent_change, Some(20.0));
    }

    #[test]
    fn test_classify_trend_within_tolerance() {
        // 10 vs 10.5 stays inside the 1.0-unit tolerance.
        let stats = classify_trend(&[10.0, 10.0, 10.5, 10.5]);
        assert_eq!(stats.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_classify_trend_decreasing() {
        let stats = classify_trend(&[20.0, 18.0, 10.0, 8.0]);
        assert_eq!(stats.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_classify_trend_short_series() {
        let stats = classify_trend(&[7.0]);
        assert_eq!(stats.direction, TrendDirection::Stable);
        assert_eq!(stats.percent_change, None);
    }

    #[test]
    fn test_classify_trend_zero_first_half() {
        let stats = classify_trend(&[0.0, 0.0, 5.0, 5.0]);
        assert_eq!(stats.direction, TrendDirection::Increasing);
        assert_eq!(stats.percent_change, None);
    }
}
