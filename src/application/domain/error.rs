//! Error types for application validation and parsing.

use super::{ApplicationId, ApplicationStatus};
use thiserror::Error;

/// Errors returned while constructing or deciding applications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationDomainError {
    /// The bid amount is negative.
    #[error("bid amount must not be negative, got {0}")]
    NegativeBid(i64),

    /// The experience figure is negative.
    #[error("years of experience must not be negative, got {0}")]
    NegativeExperience(i32),

    /// A team application did not name a team.
    #[error("team applications require a team")]
    MissingTeam,

    /// An individual application named a team.
    #[error("individual applications must not name a team")]
    UnexpectedTeam,

    /// The application was already decided.
    #[error("application {application_id} is already {status}")]
    AlreadyDecided {
        /// Application identifier.
        application_id: ApplicationId,
        /// Current status.
        status: ApplicationStatus,
    },

    /// Unknown application status in storage.
    #[error("unknown application status: {0}")]
    UnknownStatus(String),

    /// Unknown applicant kind.
    #[error("unknown applicant kind: {0}")]
    UnknownApplicantKind(String),
}
