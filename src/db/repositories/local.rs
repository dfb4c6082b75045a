//! In-memory repository implementation.
//!
//! Backs development and tests. Aggregates are computed here, standing in
//! for the server-side rollup queries a SQL backend would run.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use crate::api::{
    CaseDataset, CaseId, CaseRecord, DatasetId, DayOfWeekFlagRow, FlagRollup, RoomFlagCount,
    SurgeonFlagCount, WeeklyFlagRow, WeeklyVolumePoint,
};
use crate::db::models::BenchmarkPair;
use crate::db::repository::{
    AnalyticsRepository, DatasetRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::routes::landing::DatasetInfo;

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if date > end {
            return false;
        }
    }
    true
}

/// Compute the flag rollup over a dataset's raw flags.
///
/// This is the in-memory counterpart of the aggregation a SQL backend runs
/// server-side; the analytics services only ever see the result rows.
fn compute_flag_rollup(
    dataset: &CaseDataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> FlagRollup {
    let mut weekly: BTreeMap<NaiveDate, WeeklyFlagRow> = BTreeMap::new();
    let mut day_totals = [0u32; 7];
    let mut by_room: HashMap<String, u32> = HashMap::new();
    let mut by_surgeon: HashMap<String, u32> = HashMap::new();
    let mut total_flags = 0u32;

    for case in &dataset.cases {
        for flag in &case.flags {
            let date = flag.flagged_at.date_naive();
            if !in_range(date, start, end) {
                continue;
            }

            let week = weekly.entry(week_start(date)).or_insert(WeeklyFlagRow {
                week_start: week_start(date),
                fcots: 0,
                timing: 0,
                turnover: 0,
                delay: 0,
                financial: 0,
                quality: 0,
                total: 0,
            });
            match flag.category {
                crate::api::FlagCategory::Fcots => week.fcots += 1,
                crate::api::FlagCategory::Timing => week.timing += 1,
                crate::api::FlagCategory::Turnover => week.turnover += 1,
                crate::api::FlagCategory::Delay => week.delay += 1,
                crate::api::FlagCategory::Financial => week.financial += 1,
                crate::api::FlagCategory::Quality => week.quality += 1,
            }
            week.total += 1;

            day_totals[date.weekday().num_days_from_monday() as usize] += 1;
            *by_room.entry(case.room_id.clone()).or_insert(0) += 1;
            *by_surgeon.entry(case.surgeon_id.clone()).or_insert(0) += 1;
            total_flags += 1;
        }
    }

    let by_day: Vec<DayOfWeekFlagRow> = day_totals
        .iter()
        .enumerate()
        .filter(|(_, total)| **total > 0)
        .map(|(index, total)| DayOfWeekFlagRow {
            day_index: index as u32,
            weekday: WEEKDAY_LABELS[index].to_string(),
            total: *total,
        })
        .collect();

    let mut by_room: Vec<RoomFlagCount> = by_room
        .into_iter()
        .map(|(room_id, count)| RoomFlagCount { room_id, count })
        .collect();
    by_room.sort_by(|a, b| b.count.cmp(&a.count).then(a.room_id.cmp(&b.room_id)));

    let mut by_surgeon: Vec<SurgeonFlagCount> = by_surgeon
        .into_iter()
        .map(|(surgeon_id, count)| SurgeonFlagCount { surgeon_id, count })
        .collect();
    by_surgeon.sort_by(|a, b| b.count.cmp(&a.count).then(a.surgeon_id.cmp(&b.surgeon_id)));

    FlagRollup {
        weekly: weekly.into_values().collect(),
        by_day,
        by_room,
        by_surgeon,
        total_flags,
    }
}

/// Compute the weekly case-volume series, oldest week first.
fn compute_weekly_volume(dataset: &CaseDataset) -> Vec<WeeklyVolumePoint> {
    let utilization: HashMap<NaiveDate, f64> = dataset
        .weekly_utilization
        .iter()
        .map(|row| (row.week_start, row.utilization_percent))
        .collect();

    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for case in &dataset.cases {
        let week = week_start(case.scheduled_start.date_naive());
        *counts.entry(week).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(week, case_count)| WeeklyVolumePoint {
            week_start: week,
            case_count,
            utilization_percent: utilization.get(&week).copied(),
        })
        .collect()
}

/// Derive a facility-level benchmark from completed historical cases when
/// no row was uploaded for the procedure.
fn derived_facility_benchmark(
    dataset: &CaseDataset,
    procedure_name: &str,
) -> Option<crate::api::BenchmarkRow> {
    let completed: Vec<&CaseRecord> = dataset
        .cases
        .iter()
        .filter(|case| case.procedure_name == procedure_name && case.completed)
        .collect();

    let durations: Vec<f64> = completed
        .iter()
        .filter_map(|case| case.actual_duration_minutes)
        .collect();
    if durations.is_empty() {
        return None;
    }
    let revenues: Vec<f64> = completed
        .iter()
        .filter_map(|case| case.actual_revenue)
        .collect();

    Some(crate::api::BenchmarkRow {
        surgeon_id: None,
        procedure_name: procedure_name.to_string(),
        median_duration_minutes: crate::algorithms::median(&durations),
        median_reimbursement: crate::algorithms::median(&revenues),
        case_count: durations.len() as u32,
    })
}

struct StoredAggregates {
    rollup: FlagRollup,
    weekly_volume: Vec<WeeklyVolumePoint>,
}

struct DatasetEntry {
    dataset: CaseDataset,
    aggregates: Option<StoredAggregates>,
}

#[derive(Default)]
struct LocalStore {
    datasets: HashMap<i64, DatasetEntry>,
    next_dataset_id: i64,
    next_case_id: i64,
}

/// In-memory implementation of the repository traits.
pub struct LocalRepository {
    inner: RwLock<LocalStore>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LocalStore {
                datasets: HashMap::new(),
                next_dataset_id: 1,
                next_case_id: 1,
            }),
        }
    }

    fn info_for(dataset_id: i64, dataset: &CaseDataset) -> DatasetInfo {
        DatasetInfo {
            dataset_id: DatasetId::new(dataset_id),
            dataset_name: dataset.name.clone(),
            facility_id: dataset.facility_id.clone(),
            case_count: dataset.cases.len(),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn dataset_not_found(dataset_id: DatasetId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Dataset {} not found", dataset_id),
        ErrorContext::new("fetch_dataset")
            .with_entity("dataset")
            .with_entity_id(dataset_id),
    )
}

fn aggregates_missing(dataset_id: DatasetId) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!(
            "No aggregate data for dataset {}. Run populate_dataset_aggregates() first.",
            dataset_id
        ),
        ErrorContext::new("fetch_aggregates")
            .with_entity("dataset")
            .with_entity_id(dataset_id),
    )
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn store_dataset(&self, dataset: &CaseDataset) -> RepositoryResult<DatasetInfo> {
        let mut store = self.inner.write();

        let dataset_id = store.next_dataset_id;
        store.next_dataset_id += 1;

        let mut stored = dataset.clone();
        stored.id = Some(dataset_id);
        for case in &mut stored.cases {
            if case.id.is_none() {
                case.id = Some(CaseId::new(store.next_case_id));
                store.next_case_id += 1;
            }
        }

        let info = Self::info_for(dataset_id, &stored);
        log::debug!(
            "stored dataset {} ({} cases)",
            dataset_id,
            stored.cases.len()
        );
        store.datasets.insert(
            dataset_id,
            DatasetEntry {
                dataset: stored,
                aggregates: None,
            },
        );

        Ok(info)
    }

    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>> {
        let store = self.inner.read();
        let mut ids: Vec<i64> = store.datasets.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids
            .into_iter()
            .map(|id| Self::info_for(id, &store.datasets[&id].dataset))
            .collect())
    }

    async fn fetch_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<CaseDataset> {
        let store = self.inner.read();
        store
            .datasets
            .get(&dataset_id.value())
            .map(|entry| entry.dataset.clone())
            .ok_or_else(|| dataset_not_found(dataset_id))
    }

    async fn fetch_case(
        &self,
        dataset_id: DatasetId,
        case_id: CaseId,
    ) -> RepositoryResult<CaseRecord> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        entry
            .dataset
            .cases
            .iter()
            .find(|case| case.id == Some(case_id))
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Case {} not found in dataset {}", case_id, dataset_id),
                    ErrorContext::new("fetch_case")
                        .with_entity("case")
                        .with_entity_id(case_id),
                )
            })
    }

    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetInfo>> {
        let store = self.inner.read();
        Ok(store
            .datasets
            .iter()
            .find(|(_, entry)| entry.dataset.checksum == checksum)
            .map(|(id, entry)| Self::info_for(*id, &entry.dataset)))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl AnalyticsRepository for LocalRepository {
    async fn populate_dataset_aggregates(&self, dataset_id: DatasetId) -> RepositoryResult<usize> {
        let mut store = self.inner.write();
        let entry = store
            .datasets
            .get_mut(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        let rollup = compute_flag_rollup(&entry.dataset, None, None);
        let weekly_volume = compute_weekly_volume(&entry.dataset);

        let rows = rollup.weekly.len()
            + rollup.by_day.len()
            + rollup.by_room.len()
            + rollup.by_surgeon.len()
            + weekly_volume.len();
        log::info!("populated {} aggregate rows for dataset {}", rows, dataset_id);

        entry.aggregates = Some(StoredAggregates {
            rollup,
            weekly_volume,
        });
        Ok(rows)
    }

    async fn delete_dataset_aggregates(&self, dataset_id: DatasetId) -> RepositoryResult<usize> {
        let mut store = self.inner.write();
        let entry = store
            .datasets
            .get_mut(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        match entry.aggregates.take() {
            Some(aggregates) => Ok(aggregates.rollup.weekly.len()
                + aggregates.rollup.by_day.len()
                + aggregates.rollup.by_room.len()
                + aggregates.rollup.by_surgeon.len()
                + aggregates.weekly_volume.len()),
            None => Ok(0),
        }
    }

    async fn has_aggregate_data(&self, dataset_id: DatasetId) -> RepositoryResult<bool> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;
        Ok(entry.aggregates.is_some())
    }

    async fn fetch_flag_rollup(
        &self,
        dataset_id: DatasetId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<FlagRollup> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        // The stored rollup covers the full range; a bounded query is
        // recomputed from raw flags.
        if start.is_none() && end.is_none() {
            return entry
                .aggregates
                .as_ref()
                .map(|aggregates| aggregates.rollup.clone())
                .ok_or_else(|| aggregates_missing(dataset_id));
        }

        Ok(compute_flag_rollup(&entry.dataset, start, end))
    }

    async fn fetch_weekly_volume(
        &self,
        dataset_id: DatasetId,
        weeks: usize,
    ) -> RepositoryResult<Vec<WeeklyVolumePoint>> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        let aggregates = entry
            .aggregates
            .as_ref()
            .ok_or_else(|| aggregates_missing(dataset_id))?;

        let volume = &aggregates.weekly_volume;
        let skip = volume.len().saturating_sub(weeks);
        Ok(volume[skip..].to_vec())
    }

    async fn fetch_benchmarks(
        &self,
        dataset_id: DatasetId,
        surgeon_id: &str,
        procedure_name: &str,
    ) -> RepositoryResult<BenchmarkPair> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        let mut pair = BenchmarkPair::resolve(&entry.dataset.benchmarks, surgeon_id, procedure_name);
        if pair.facility.is_none() {
            pair.facility = derived_facility_benchmark(&entry.dataset, procedure_name);
        }
        Ok(pair)
    }

    async fn fetch_benchmark_rows(
        &self,
        dataset_id: DatasetId,
    ) -> RepositoryResult<Vec<crate::api::BenchmarkRow>> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;
        Ok(entry.dataset.benchmarks.clone())
    }

    async fn fetch_cases_for_surgeon_date(
        &self,
        dataset_id: DatasetId,
        surgeon_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<CaseRecord>> {
        let store = self.inner.read();
        let entry = store
            .datasets
            .get(&dataset_id.value())
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        Ok(entry
            .dataset
            .cases
            .iter()
            .filter(|case| {
                case.surgeon_id == surgeon_id && case.scheduled_start.date_naive() == date
            })
            .cloned()
            .collect())
    }
}
