//! High-level database service functions.
//!
//! These functions orchestrate repository calls and cross-cutting concerns
//! (checksum deduplication, aggregate population) and work with any
//! repository implementation.

use super::repository::{FullRepository, RepositoryResult};
use crate::api::{CaseDataset, DatasetId};
use crate::routes::landing::DatasetInfo;

/// Store a dataset and populate its aggregates.
pub async fn store_dataset(
    repo: &dyn FullRepository,
    dataset: &CaseDataset,
) -> RepositoryResult<DatasetInfo> {
    store_dataset_with_options(repo, dataset, true).await
}

/// Store a dataset, optionally populating aggregates.
///
/// Uploads carrying a checksum already present in the store are
/// deduplicated: the existing dataset's info is returned unchanged.
pub async fn store_dataset_with_options(
    repo: &dyn FullRepository,
    dataset: &CaseDataset,
    populate_aggregates: bool,
) -> RepositoryResult<DatasetInfo> {
    if !dataset.checksum.is_empty() {
        if let Some(existing) = repo.find_by_checksum(&dataset.checksum).await? {
            log::info!(
                "dataset with checksum {} already stored as id {}",
                dataset.checksum,
                existing.dataset_id
            );
            return Ok(existing);
        }
    }

    let info = repo.store_dataset(dataset).await?;
    if populate_aggregates {
        repo.populate_dataset_aggregates(info.dataset_id).await?;
    }
    Ok(info)
}

/// List all stored datasets.
pub async fn list_datasets(repo: &dyn FullRepository) -> RepositoryResult<Vec<DatasetInfo>> {
    repo.list_datasets().await
}

/// Fetch a full dataset.
pub async fn get_dataset(
    repo: &dyn FullRepository,
    dataset_id: DatasetId,
) -> RepositoryResult<CaseDataset> {
    repo.fetch_dataset(dataset_id).await
}

/// Make sure aggregate data exists for a dataset.
///
/// # Returns
/// * `Ok(true)` if aggregates were (re)computed by this call
/// * `Ok(false)` if they already existed
pub async fn ensure_aggregates(
    repo: &dyn FullRepository,
    dataset_id: DatasetId,
) -> RepositoryResult<bool> {
    if repo.has_aggregate_data(dataset_id).await? {
        return Ok(false);
    }
    repo.populate_dataset_aggregates(dataset_id).await?;
    Ok(true)
}

/// Check that the backend is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
