//! Outbox port drained by the dispatcher.

use crate::notification::domain::{OutboxEntry, OutboxEntryId};
use crate::shared::WriteOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for outbox operations.
pub type NotificationOutboxResult<T> = Result<T, NotificationOutboxError>;

/// Read and acknowledgement side of the notification outbox.
///
/// Entries are written by the application ledger together with the
/// decision they announce; this port only reads and settles them.
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Returns up to `limit` pending entries, oldest first.
    async fn pending(&self, limit: usize) -> NotificationOutboxResult<Vec<OutboxEntry>>;

    /// Marks a pending entry delivered. An entry already delivered yields
    /// [`WriteOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`NotificationOutboxError::NotFound`] for an unknown entry.
    async fn mark_delivered(
        &self,
        id: OutboxEntryId,
        at: DateTime<Utc>,
    ) -> NotificationOutboxResult<WriteOutcome>;

    /// Increments the attempt count and stores `error` as the latest
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationOutboxError::NotFound`] for an unknown entry.
    async fn record_failure(&self, id: OutboxEntryId, error: &str)
    -> NotificationOutboxResult<()>;
}

/// Errors returned by outbox implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationOutboxError {
    /// The entry was not found.
    #[error("outbox entry not found: {0}")]
    NotFound(OutboxEntryId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted outbox data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationOutboxError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
