//! Job tracking for async dataset processing.
//!
//! This module provides a simple in-memory job tracker that stores progress
//! logs for background tasks like dataset upload and aggregate population.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// Job metadata and logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub job_id: String,
    /// Short human label, e.g. the dataset name being processed
    pub label: String,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Result of the job (e.g., dataset_id if successful)
    pub result: Option<serde_json::Value>,
}

impl Job {
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}

/// In-memory job tracker.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobTracker {
    /// Create a new job tracker.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new job and return its ID.
    pub fn create_job(&self, label: impl Into<String>) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = Job {
            job_id: job_id.clone(),
            label: label.into(),
            status: JobStatus::Running,
            logs: vec![],
            created_at: chrono::Utc::now(),
            completed_at: None,
            result: None,
        };
        self.jobs.write().insert(job_id.clone(), job);
        job_id
    }

    /// Add a log entry to a job.
    pub fn log(&self, job_id: &str, level: LogLevel, message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a job as completed with optional result.
    pub fn complete_job(&self, job_id: &str, result: Option<serde_json::Value>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(chrono::Utc::now());
            job.result = result;
        }
    }

    /// Mark a job as failed.
    pub fn fail_job(&self, job_id: &str, error_message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.status = JobStatus::Failed;
            job.completed_at = Some(chrono::Utc::now());
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Get all logs for a job.
    pub fn get_logs(&self, job_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_lifecycle() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job("upload march.json");

        let job = tracker.get_job(&job_id).unwrap();
        assert!(job.is_running());
        assert_eq!(job.label, "upload march.json");

        tracker.log(&job_id, LogLevel::Info, "parsing");
        tracker.complete_job(&job_id, Some(serde_json::json!({"dataset_id": 1})));

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(!job.is_running());
        assert_eq!(job.logs.len(), 1);
        assert!(job.result.is_some());
    }

    #[test]
    fn test_failed_job_records_error_log() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job("upload");

        tracker.fail_job(&job_id, "bad payload");

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(tracker.get_logs(&job_id).len(), 1);
    }

    #[test]
    fn test_unknown_job() {
        let tracker = JobTracker::new();
        assert!(tracker.get_job("missing").is_none());
        assert!(tracker.get_logs("missing").is_empty());
    }
}
