//! Async dataset processing service.
//!
//! Handles heavy dataset upload tasks (parsing, validation, storage,
//! aggregate population) in the background, emitting progress logs.

use crate::api::DatasetId;
use crate::db::repository::FullRepository;
use crate::db::services as db_services;
use crate::models;
use crate::services::job_tracker::{JobTracker, LogLevel};
use std::sync::Arc;

/// Process a dataset asynchronously: parse, validate, store, and populate
/// aggregates.
///
/// This function is designed to be spawned as a background task. It logs
/// progress to the job tracker so users can follow along via SSE.
///
/// # Arguments
/// * `job_id` - The job ID for tracking progress
/// * `tracker` - Job tracker for logging
/// * `repo` - Repository for storing the dataset
/// * `dataset_name` - Name for the dataset
/// * `dataset_json` - JSON string of the dataset
/// * `populate_aggregates` - Whether to populate aggregates after storing
///
/// # Returns
/// * Dataset ID on success, or error message on failure
pub async fn process_dataset_async(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn FullRepository>,
    dataset_name: String,
    dataset_json: String,
    populate_aggregates: bool,
) -> Result<DatasetId, String> {
    tracker.log(&job_id, LogLevel::Info, "Starting dataset processing...");

    // Step 1: Parse dataset JSON
    tracker.log(&job_id, LogLevel::Info, "Parsing dataset JSON...");
    let dataset = match tokio::task::spawn_blocking({
        let dataset_json = dataset_json.clone();
        let dataset_name = dataset_name.clone();
        move || {
            models::dataset::parse_dataset_json_str(&dataset_json).map(|mut d| {
                if d.name.is_empty() {
                    d.name = dataset_name;
                }
                d
            })
        }
    })
    .await
    {
        Ok(Ok(dataset)) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!("Parsed dataset with {} cases", dataset.cases.len()),
            );
            dataset
        }
        Ok(Err(e)) => {
            let msg = format!("Failed to parse dataset: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
        Err(e) => {
            let msg = format!("Parse task panic: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    let benchmark_count = dataset.benchmarks.len();
    if benchmark_count > 0 {
        tracker.log(
            &job_id,
            LogLevel::Info,
            format!("Loaded {} benchmark rows", benchmark_count),
        );
    }
    let flag_count: usize = dataset.cases.iter().map(|c| c.flags.len()).sum();
    tracker.log(
        &job_id,
        LogLevel::Info,
        format!("Found {} operational flags", flag_count),
    );

    // Step 2: Store dataset
    tracker.log(&job_id, LogLevel::Info, "Storing dataset in repository...");
    let info = match db_services::store_dataset_with_options(
        repo.as_ref(),
        &dataset,
        populate_aggregates,
    )
    .await
    {
        Ok(info) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!("Stored dataset (ID: {})", info.dataset_id.value()),
            );
            info
        }
        Err(e) => {
            let msg = format!("Failed to store dataset: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };

    // Step 3: Log aggregate population if enabled
    if populate_aggregates {
        tracker.log(&job_id, LogLevel::Info, "Aggregates populated successfully");
    }

    tracker.log(
        &job_id,
        LogLevel::Success,
        format!(
            "Dataset processing complete! ID: {}",
            info.dataset_id.value()
        ),
    );

    let result = serde_json::json!({
        "dataset_id": info.dataset_id.value(),
        "dataset_name": info.dataset_name,
    });
    tracker.complete_job(&job_id, Some(result));

    Ok(info.dataset_id)
}
