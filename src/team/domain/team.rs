//! Team aggregate and its value types.

use super::TeamDomainError;
use crate::shared::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new random team identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a team identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated team name.
///
/// Names compare case-sensitively here; the store enforces uniqueness on
/// the lower-cased form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Maximum name length in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Creates a trimmed, non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyName`] for blank input and
    /// [`TeamDomainError::NameTooLong`] past [`Self::MAX_LENGTH`].
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyName);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TeamDomainError::NameTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key used for case-insensitive uniqueness.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated attributes for a new team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    /// Team name.
    pub name: TeamName,
    /// Optional description; blank input is stored as `None`.
    pub description: Option<String>,
    /// Owning coder.
    pub owner_id: UserId,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Persisted identifier.
    pub id: TeamId,
    /// Persisted name.
    pub name: TeamName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted owner.
    pub owner_id: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A team with a single owning coder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: TeamName,
    description: Option<String>,
    owner_id: UserId,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team owned by `new_team.owner_id`.
    #[must_use]
    pub fn new(new_team: NewTeam, clock: &impl Clock) -> Self {
        let description = new_team
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self {
            id: TeamId::new(),
            name: new_team.name,
            description,
            owner_id: new_team.owner_id,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            created_at: data.created_at,
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning coder.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns whether `user_id` owns this team.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
