//! In-memory repository for team tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::shared::UserId;
use crate::team::{
    domain::{Team, TeamId},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};

/// Thread-safe in-memory team repository.
///
/// Mirrors the store's unique indexes on the lower-cased name and on the
/// owner.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<HashMap<TeamId, Team>>>,
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> TeamRepositoryError {
    TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let name_key = team.name().normalized();
        if state
            .values()
            .any(|existing| existing.name().normalized() == name_key)
        {
            return Err(TeamRepositoryError::DuplicateTeamName(team.name().clone()));
        }
        if state
            .values()
            .any(|existing| existing.owner_id() == team.owner_id())
        {
            return Err(TeamRepositoryError::OwnerAlreadyHasTeam(team.owner_id()));
        }
        state.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> TeamRepositoryResult<Option<Team>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .find(|team| team.owner_id() == owner_id)
            .cloned())
    }
}
