//! Error types for notification parsing.

use thiserror::Error;

/// Errors returned while reconstructing notification values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// Unknown notification kind.
    #[error("unknown notification kind: {0}")]
    UnknownKind(String),

    /// Unknown outbox status.
    #[error("unknown outbox status: {0}")]
    UnknownOutboxStatus(String),

    /// A dedupe key that is not `<application id>:<kind>`.
    #[error("malformed notification key: {0}")]
    MalformedKey(String),
}
