//! In-memory repository for project lifecycle tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Activation, Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, StatusTransition},
};
use crate::shared::{UserId, WriteOutcome};

/// Thread-safe in-memory project repository.
///
/// Guarded writes run under a single write lock, which gives them the same
/// all-or-nothing behaviour as a conditional `UPDATE`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a project verbatim, bypassing lifecycle rules.
    ///
    /// Intended for seeding legacy rows and elapsed windows in tests.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] if the lock is
    /// poisoned.
    pub fn seed(&self, project: Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(project.id(), project);
        Ok(())
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn newest_first(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by_key(|project| (Reverse(project.created_at()), project.id()));
    projects
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn activate(
        &self,
        id: ProjectId,
        activation: &Activation,
    ) -> ProjectRepositoryResult<WriteOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        let project = state
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;

        if !project.status().can_activate() {
            return Ok(WriteOutcome::Skipped);
        }
        project
            .activate(activation)
            .map_err(ProjectRepositoryError::persistence)?;
        Ok(WriteOutcome::Applied)
    }

    async fn transition_status(
        &self,
        id: ProjectId,
        transition: StatusTransition,
    ) -> ProjectRepositoryResult<WriteOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        let project = state
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;

        if project.status() != transition.expected {
            return Ok(WriteOutcome::Skipped);
        }
        let mut data = project.to_persisted();
        data.status = transition.target;
        data.updated_at = transition.at;
        *project = Project::from_persisted(data);
        Ok(WriteOutcome::Applied)
    }

    async fn list_accepting_bids(
        &self,
        now: DateTime<Utc>,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let projects = state
            .values()
            .filter(|project| project.is_biddable(now))
            .cloned()
            .collect();
        Ok(newest_first(projects))
    }

    async fn list_by_hirer(&self, hirer_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let projects = state
            .values()
            .filter(|project| project.hirer_id() == hirer_id)
            .cloned()
            .collect();
        Ok(newest_first(projects))
    }
}
