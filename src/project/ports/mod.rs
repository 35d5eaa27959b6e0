//! Port contracts for the project lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by project services.

pub mod repository;

pub use repository::{
    ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, StatusTransition,
};
