//! Cross-cutting error classification.
//!
//! Each service keeps its own error enum; [`ErrorKind`] folds them onto a
//! single taxonomy so callers can render user-facing messages and decide
//! whether a retry makes sense.

use std::fmt;

/// Coarse classification shared by all service error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input shape or range; the user can correct it.
    Validation,
    /// The caller lacks rights for the entity.
    Authorization,
    /// A referenced entity does not exist.
    NotFound,
    /// The operation is not legal in the current lifecycle state.
    InvalidState,
    /// The applicant already applied to the project.
    DuplicateApplication,
    /// The bidding window has elapsed or the project is not open for bids.
    BiddingClosed,
    /// Retryable infrastructure failure in the store.
    TransientStore,
    /// A store or channel call exceeded its time bound.
    Timeout,
}

impl ErrorKind {
    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::DuplicateApplication => "duplicate_application",
            Self::BiddingClosed => "bidding_closed",
            Self::TransientStore => "transient_store",
            Self::Timeout => "timeout",
        }
    }

    /// Returns whether a caller may retry the operation with backoff.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::TransientStore | Self::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
