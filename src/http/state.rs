//! Application state for the HTTP server.

use crate::db::repository::FullRepository;
use crate::models::FacilityConfig;
use crate::services::job_tracker::JobTracker;
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Tracker for background dataset-processing jobs
    pub job_tracker: JobTracker,
    /// Facility settings supplied to the analytics services
    pub facility: Arc<FacilityConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and
    /// facility settings.
    pub fn new(repository: Arc<dyn FullRepository>, facility: FacilityConfig) -> Self {
        Self {
            repository,
            job_tracker: JobTracker::new(),
            facility: Arc::new(facility),
        }
    }
}
