//! Factory for creating repository instances.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Supported repository backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory backend for development and tests
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(RepositoryType::Local),
            other => Err(RepositoryError::configuration(format!(
                "Unknown repository type '{}'",
                other
            ))),
        }
    }
}

/// Factory for constructing repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a repository for the given backend type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}

/// Builder-style construction for callers that resolve the backend from
/// configuration.
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
}

impl RepositoryBuilder {
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
        }
    }

    pub fn with_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type)
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
