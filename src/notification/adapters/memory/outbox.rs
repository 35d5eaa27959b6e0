//! In-memory notification outbox.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::notification::{
    domain::{OutboxEntry, OutboxEntryId, OutboxStatus},
    ports::{NotificationOutbox, NotificationOutboxError, NotificationOutboxResult},
};
use crate::shared::WriteOutcome;

/// Thread-safe in-memory outbox.
///
/// Entries are unique on their notification key, like the store's
/// `dedupe_key` index. The in-memory application repository enqueues into
/// a shared handle while holding its own write lock, so a decision and its
/// entry become visible together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationOutbox {
    entries: Arc<RwLock<Vec<OutboxEntry>>>,
}

impl InMemoryNotificationOutbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` unless an entry with the same key exists.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationOutboxError::Persistence`] if the lock is
    /// poisoned.
    pub fn enqueue(&self, entry: OutboxEntry) -> NotificationOutboxResult<WriteOutcome> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        if entries.iter().any(|existing| existing.key() == entry.key()) {
            return Ok(WriteOutcome::Skipped);
        }
        entries.push(entry);
        Ok(WriteOutcome::Applied)
    }

    /// Returns every entry, delivered ones included, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationOutboxError::Persistence`] if the lock is
    /// poisoned.
    pub fn entries(&self) -> NotificationOutboxResult<Vec<OutboxEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.clone())
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> NotificationOutboxError {
    NotificationOutboxError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationOutbox for InMemoryNotificationOutbox {
    async fn pending(&self, limit: usize) -> NotificationOutboxResult<Vec<OutboxEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        let mut pending: Vec<OutboxEntry> = entries
            .iter()
            .filter(|entry| entry.status() == OutboxStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|entry| (entry.created_at(), entry.id()));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn mark_delivered(
        &self,
        id: OutboxEntryId,
        at: DateTime<Utc>,
    ) -> NotificationOutboxResult<WriteOutcome> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or(NotificationOutboxError::NotFound(id))?;
        if entry.status() == OutboxStatus::Delivered {
            return Ok(WriteOutcome::Skipped);
        }
        entry.mark_delivered(at);
        Ok(WriteOutcome::Applied)
    }

    async fn record_failure(
        &self,
        id: OutboxEntryId,
        error: &str,
    ) -> NotificationOutboxResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or(NotificationOutboxError::NotFound(id))?;
        entry.record_failure(error);
        Ok(())
    }
}
