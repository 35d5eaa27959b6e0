//! Repository port for application persistence.

use crate::application::domain::{Application, ApplicationId, Decision};
use crate::notification::domain::OutboxEntry;
use crate::project::domain::ProjectId;
use crate::shared::{UserId, WriteOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for application repository operations.
pub type ApplicationRepositoryResult<T> = Result<T, ApplicationRepositoryError>;

/// A decision together with the outbox entry announcing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    /// Application being decided.
    pub application_id: ApplicationId,
    /// The hirer's verdict.
    pub decision: Decision,
    /// Decision timestamp.
    pub decided_at: DateTime<Utc>,
    /// Entry to queue in the same atomic operation.
    pub outbox_entry: OutboxEntry,
}

/// Application persistence contract.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts a new application.
    ///
    /// Uniqueness of (project, applicant) is enforced by the insert itself,
    /// so concurrent submissions cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::DuplicateApplication`] when the
    /// applicant already applied to the project.
    async fn insert(&self, application: &Application) -> ApplicationRepositoryResult<()>;

    /// Finds an application by identifier.
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Writes a decision if the application is still pending, and queues
    /// its outbox entry in the same atomic operation. Returns
    /// [`WriteOutcome::Skipped`] without queuing anything when the
    /// application was already decided.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] for an unknown
    /// application.
    async fn record_decision(
        &self,
        record: &DecisionRecord,
    ) -> ApplicationRepositoryResult<WriteOutcome>;

    /// Returns applications for a project, newest first.
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ApplicationRepositoryResult<Vec<Application>>;

    /// Returns applications by an applicant, newest first.
    async fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Vec<Application>>;
}

/// Errors returned by application repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ApplicationRepositoryError {
    /// The applicant already applied to the project.
    #[error("user {applicant_id} already applied to project {project_id}")]
    DuplicateApplication {
        /// Project applied to.
        project_id: ProjectId,
        /// Applying user.
        applicant_id: UserId,
    },

    /// The application was not found.
    #[error("application not found: {0}")]
    NotFound(ApplicationId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted application data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApplicationRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
