//! Repository port for project persistence and guarded lifecycle writes.

use crate::project::domain::{Activation, Project, ProjectId, ProjectStatus};
use crate::shared::{UserId, WriteOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Compare-and-set status change applied by [`ProjectRepository::transition_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status the stored row must still carry.
    pub expected: ProjectStatus,
    /// Status to write.
    pub target: ProjectStatus,
    /// Timestamp recorded as `updated_at`.
    pub at: DateTime<Utc>,
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the ID
    /// already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Activates a project if, and only if, its stored status still allows
    /// activation (`draft` or `open`). The check and the write form one
    /// atomic statement; a duplicate confirmation observes
    /// [`WriteOutcome::Skipped`] and leaves the bidding deadline untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn activate(
        &self,
        id: ProjectId,
        activation: &Activation,
    ) -> ProjectRepositoryResult<WriteOutcome>;

    /// Writes `transition.target` if the stored status still equals
    /// `transition.expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn transition_status(
        &self,
        id: ProjectId,
        transition: StatusTransition,
    ) -> ProjectRepositoryResult<WriteOutcome>;

    /// Returns projects accepting bids at `now`, newest first.
    async fn list_accepting_bids(&self, now: DateTime<Utc>)
    -> ProjectRepositoryResult<Vec<Project>>;

    /// Returns every project owned by `hirer_id`, newest first.
    async fn list_by_hirer(&self, hirer_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted project data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
