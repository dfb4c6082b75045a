//! Analytics repository trait for pre-computed aggregate operations.
//!
//! This trait defines operations for managing and querying pre-aggregated
//! analytics rows: weekly/day-of-week flag rollups, weekly case volume,
//! and benchmark medians. The analytics services consume these rows as-is
//! and never re-derive raw event-level data.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{CaseRecord, DatasetId, FlagRollup, WeeklyVolumePoint};
use crate::db::models::BenchmarkPair;

/// Repository trait for aggregate analytics operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Populate the aggregate tables for a dataset.
    ///
    /// Pre-computes the flag rollups and weekly volume rows that back the
    /// pattern and trend endpoints.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of aggregate rows computed
    async fn populate_dataset_aggregates(&self, dataset_id: DatasetId) -> RepositoryResult<usize>;

    /// Delete aggregate data for a dataset.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn delete_dataset_aggregates(&self, dataset_id: DatasetId) -> RepositoryResult<usize>;

    /// Check if aggregate data exists for a dataset.
    async fn has_aggregate_data(&self, dataset_id: DatasetId) -> RepositoryResult<bool>;

    /// Fetch the flag rollup for pattern detection.
    ///
    /// Without a date range this returns the stored full-range rollup;
    /// with one, the rollup is recomputed over flags inside the range
    /// (both bounds inclusive).
    async fn fetch_flag_rollup(
        &self,
        dataset_id: DatasetId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<FlagRollup>;

    /// Fetch the trailing weekly case-volume series, oldest week first.
    async fn fetch_weekly_volume(
        &self,
        dataset_id: DatasetId,
        weeks: usize,
    ) -> RepositoryResult<Vec<WeeklyVolumePoint>>;

    /// Fetch the surgeon-level and facility-level benchmark rows for a
    /// surgeon/procedure combination.
    async fn fetch_benchmarks(
        &self,
        dataset_id: DatasetId,
        surgeon_id: &str,
        procedure_name: &str,
    ) -> RepositoryResult<BenchmarkPair>;

    /// Fetch all benchmark rows for a dataset.
    async fn fetch_benchmark_rows(
        &self,
        dataset_id: DatasetId,
    ) -> RepositoryResult<Vec<crate::api::BenchmarkRow>>;

    /// Fetch a surgeon's cases scheduled on a given date.
    async fn fetch_cases_for_surgeon_date(
        &self,
        dataset_id: DatasetId,
        surgeon_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<CaseRecord>>;
}
