//! Error types for project domain validation and parsing.

use super::{ProjectId, ProjectStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating projects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project title is empty after trimming.
    #[error("project title must not be empty")]
    EmptyTitle,

    /// The project title exceeds the storage limit.
    #[error("project title exceeds {max} characters")]
    TitleTooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },

    /// The project description is empty after trimming.
    #[error("project description must not be empty")]
    EmptyDescription,

    /// The budget is negative.
    #[error("project budget must not be negative, got {0}")]
    NegativeBudget(i64),

    /// The requested lifecycle transition is not allowed.
    #[error("project {project_id} cannot move from {from} to {to}")]
    InvalidLifecycleTransition {
        /// Project identifier.
        project_id: ProjectId,
        /// Current lifecycle status.
        from: ProjectStatus,
        /// Requested lifecycle status.
        to: ProjectStatus,
    },
}

/// Error returned while parsing project statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing hire preferences.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown hire preference: {0}")]
pub struct ParseHirePreferenceError(pub String);
