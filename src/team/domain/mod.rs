//! Domain model for teams.

mod error;
mod team;

pub use error::TeamDomainError;
pub use team::{NewTeam, PersistedTeamData, Team, TeamId, TeamName};
