//! Application services for the team registry.

mod registry;

pub use registry::{CreateTeamRequest, TeamService, TeamServiceError, TeamServiceResult};
