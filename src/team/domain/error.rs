//! Error types for team validation.

use thiserror::Error;

/// Errors returned while constructing teams.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyName,

    /// The team name exceeds the storage limit.
    #[error("team name exceeds {max} characters")]
    NameTooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}
