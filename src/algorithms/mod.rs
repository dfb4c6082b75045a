//! Shared analytical algorithms.
//!
//! Statistical routines used by more than one service live here so the
//! services stay focused on domain logic.

pub mod analysis;

pub use analysis::{
    classify_trend, mean, median, percent_change, percentile, TrendDirection, TrendStats,
};
