//! In-memory repository for application ledger tests.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::application::{
    domain::{Application, ApplicationId},
    ports::{
        ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult,
        DecisionRecord,
    },
};
use crate::notification::adapters::memory::InMemoryNotificationOutbox;
use crate::project::domain::ProjectId;
use crate::shared::{UserId, WriteOutcome};

/// Thread-safe in-memory application repository.
///
/// Decisions are queued into an [`InMemoryNotificationOutbox`] while the
/// application write lock is held, so the status change and its outbox
/// entry appear together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationRepository {
    state: Arc<RwLock<HashMap<ApplicationId, Application>>>,
    outbox: InMemoryNotificationOutbox,
}

impl InMemoryApplicationRepository {
    /// Creates an empty repository with its own outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository queuing into `outbox`.
    #[must_use]
    pub fn with_outbox(outbox: InMemoryNotificationOutbox) -> Self {
        Self {
            state: Arc::default(),
            outbox,
        }
    }

    /// Returns a handle to the outbox decisions are queued into.
    #[must_use]
    pub const fn outbox(&self) -> &InMemoryNotificationOutbox {
        &self.outbox
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> ApplicationRepositoryError {
    ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn newest_first(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by_key(|application| (Reverse(application.created_at()), application.id()));
    applications
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let duplicate = state.values().any(|existing| {
            existing.project_id() == application.project_id()
                && existing.applicant_id() == application.applicant_id()
        });
        if duplicate {
            return Err(ApplicationRepositoryError::DuplicateApplication {
                project_id: application.project_id(),
                applicant_id: application.applicant_id(),
            });
        }
        state.insert(application.id(), application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn record_decision(
        &self,
        record: &DecisionRecord,
    ) -> ApplicationRepositoryResult<WriteOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get_mut(&record.application_id)
            .ok_or(ApplicationRepositoryError::NotFound(record.application_id))?;
        if !stored.status().is_pending() {
            return Ok(WriteOutcome::Skipped);
        }

        let mut decided = stored.clone();
        decided
            .decide(record.decision, record.decided_at)
            .map_err(ApplicationRepositoryError::persistence)?;
        self.outbox
            .enqueue(record.outbox_entry.clone())
            .map_err(ApplicationRepositoryError::persistence)?;
        *stored = decided;
        Ok(WriteOutcome::Applied)
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ApplicationRepositoryResult<Vec<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        let applications = state
            .values()
            .filter(|application| application.project_id() == project_id)
            .cloned()
            .collect();
        Ok(newest_first(applications))
    }

    async fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Vec<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        let applications = state
            .values()
            .filter(|application| application.applicant_id() == applicant_id)
            .cloned()
            .collect();
        Ok(newest_first(applications))
    }
}
