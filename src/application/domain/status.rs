//! Application status, applicant kind, and hirer decisions.

use super::ApplicationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting the hirer's decision.
    Pending,
    /// Accepted by the hirer.
    Accepted,
    /// Rejected by the hirer.
    Rejected,
}

impl ApplicationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether a decision can still be recorded.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ApplicationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ApplicationDomainError::UnknownStatus(value.to_owned())),
        }
    }
}

/// Whether the applicant bids alone or for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantKind {
    /// A coder applying alone.
    Individual,
    /// A team owner applying for the team.
    Team,
}

impl ApplicantKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for ApplicantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ApplicantKind {
    type Error = ApplicationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "team" => Ok(Self::Team),
            _ => Err(ApplicationDomainError::UnknownApplicantKind(
                value.to_owned(),
            )),
        }
    }
}

/// A hirer's verdict on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Accept the application.
    Accept,
    /// Reject the application.
    Reject,
}

impl Decision {
    /// Returns the status the application moves to.
    #[must_use]
    pub const fn resulting_status(self) -> ApplicationStatus {
        match self {
            Self::Accept => ApplicationStatus::Accepted,
            Self::Reject => ApplicationStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        })
    }
}
