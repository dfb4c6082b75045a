//! Repository trait definitions.
//!
//! The repository pattern abstracts the storage backend behind async
//! traits so implementations can be swapped (in-memory for development and
//! tests, a SQL backend in production deployments).

pub mod analytics;
pub mod error;

pub use analytics::AnalyticsRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{CaseDataset, CaseId, CaseRecord, DatasetId};
use crate::routes::landing::DatasetInfo;

/// Repository trait for dataset storage operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Store a dataset and assign IDs to it and its cases.
    ///
    /// # Returns
    /// * `Ok(DatasetInfo)` - Metadata for the stored dataset
    async fn store_dataset(&self, dataset: &CaseDataset) -> RepositoryResult<DatasetInfo>;

    /// List all stored datasets.
    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>>;

    /// Fetch a full dataset by ID.
    async fn fetch_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<CaseDataset>;

    /// Fetch a single case by dataset and case ID.
    async fn fetch_case(
        &self,
        dataset_id: DatasetId,
        case_id: CaseId,
    ) -> RepositoryResult<CaseRecord>;

    /// Find a dataset by content checksum, for upload deduplication.
    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetInfo>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Combined repository surface used by the application.
pub trait FullRepository: DatasetRepository + AnalyticsRepository {}

impl<T: DatasetRepository + AnalyticsRepository> FullRepository for T {}
