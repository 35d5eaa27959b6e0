//! Service layer for team creation and ownership checks.

use crate::config::MarketplaceConfig;
use crate::deadline::{self, DeadlineElapsed};
use crate::error::ErrorKind;
use crate::shared::UserId;
use crate::team::{
    domain::{NewTeam, Team, TeamDomainError, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    owner_id: UserId,
    name: String,
    description: Option<String>,
}

impl CreateTeamRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
            description: None,
        }
    }

    /// Sets the team description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for team operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TeamRepositoryError),
    /// A store call exceeded its bound.
    #[error(transparent)]
    Timeout(#[from] DeadlineElapsed),
    /// No team exists with the given identifier.
    #[error("team {0} not found")]
    NotFound(TeamId),
    /// The user does not own the team.
    #[error("user {user_id} does not own team {team_id}")]
    NotOwner {
        /// Team identifier.
        team_id: TeamId,
        /// Caller identifier.
        user_id: UserId,
    },
}

impl TeamServiceError {
    /// Classifies the error on the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Repository(TeamRepositoryError::DuplicateTeamName(_)) => {
                ErrorKind::Validation
            }
            Self::Repository(TeamRepositoryError::OwnerAlreadyHasTeam(_)) => {
                ErrorKind::InvalidState
            }
            Self::Repository(
                TeamRepositoryError::InvalidPersistedData(_) | TeamRepositoryError::Persistence(_),
            ) => ErrorKind::TransientStore,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotOwner { .. } => ErrorKind::Authorization,
        }
    }
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

/// Team registry orchestration service.
pub struct TeamService<T, C>
where
    T: TeamRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<T>,
    clock: Arc<C>,
    config: MarketplaceConfig,
}

impl<T, C> Clone for TeamService<T, C>
where
    T: TeamRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<T, C> TeamService<T, C>
where
    T: TeamRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new team service.
    #[must_use]
    pub const fn new(repository: Arc<T>, clock: Arc<C>, config: MarketplaceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    async fn bounded<V, F>(&self, operation: &'static str, future: F) -> TeamServiceResult<V>
    where
        F: Future<Output = Result<V, TeamRepositoryError>>,
    {
        let result = deadline::within(operation, self.config.store_timeout, future).await?;
        Ok(result?)
    }

    /// Creates a team owned by the requesting coder.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] for an invalid name and
    /// [`TeamServiceError::Repository`] when the name is taken or the owner
    /// already has a team.
    pub async fn create_team(&self, request: CreateTeamRequest) -> TeamServiceResult<Team> {
        let team = Team::new(
            NewTeam {
                name: TeamName::new(request.name)?,
                description: request.description,
                owner_id: request.owner_id,
            },
            &*self.clock,
        );
        self.bounded("team.store", self.repository.store(&team))
            .await?;
        tracing::info!(team_id = %team.id(), owner_id = %team.owner_id(), "team created");
        Ok(team)
    }

    /// Finds a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn find(&self, team_id: TeamId) -> TeamServiceResult<Option<Team>> {
        self.bounded("team.find_by_id", self.repository.find_by_id(team_id))
            .await
    }

    /// Finds the team owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn find_owned_by(&self, owner_id: UserId) -> TeamServiceResult<Option<Team>> {
        self.bounded("team.find_by_owner", self.repository.find_by_owner(owner_id))
            .await
    }

    /// Confirms that `user_id` owns `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotFound`] for an unknown team and
    /// [`TeamServiceError::NotOwner`] when someone else owns it.
    pub async fn ensure_owner(&self, team_id: TeamId, user_id: UserId) -> TeamServiceResult<Team> {
        let team = self
            .find(team_id)
            .await?
            .ok_or(TeamServiceError::NotFound(team_id))?;
        if !team.is_owned_by(user_id) {
            return Err(TeamServiceError::NotOwner { team_id, user_id });
        }
        Ok(team)
    }
}
