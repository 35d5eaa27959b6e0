//! Port contracts for the team registry.

pub mod repository;

pub use repository::{TeamRepository, TeamRepositoryError, TeamRepositoryResult};
