use crate::api::DatasetId;
use serde::{Deserialize, Serialize};

/// Dataset information with case counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset_id: DatasetId,
    pub dataset_name: String,
    pub facility_id: String,
    pub case_count: usize,
}

pub const LIST_DATASETS: &str = "list_datasets";
pub const POST_DATASET: &str = "store_dataset";
