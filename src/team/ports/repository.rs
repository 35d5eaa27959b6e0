//! Repository port for team persistence.

use crate::shared::UserId;
use crate::team::domain::{Team, TeamId, TeamName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeamName`] when another team
    /// has the same name ignoring case, and
    /// [`TeamRepositoryError::OwnerAlreadyHasTeam`] when the owner already
    /// owns a team.
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>>;

    /// Finds the team owned by `owner_id`, if any.
    async fn find_by_owner(&self, owner_id: UserId) -> TeamRepositoryResult<Option<Team>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A team with the same name already exists.
    #[error("team name already taken: {0}")]
    DuplicateTeamName(TeamName),

    /// The owner already owns a team.
    #[error("user {0} already owns a team")]
    OwnerAlreadyHasTeam(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted team data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
