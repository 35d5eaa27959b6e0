//! Outbox entries written alongside decisions.

use super::{Notification, NotificationDomainError, NotificationKey};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an outbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutboxEntryId(Uuid);

impl OutboxEntryId {
    /// Creates a new random entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entry identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for OutboxEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OutboxEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery state of an outbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Awaiting delivery.
    Pending,
    /// Delivered to the channel.
    Delivered,
}

impl OutboxStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
        }
    }
}

impl TryFrom<&str> for OutboxStatus {
    type Error = NotificationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "delivered" => Ok(Self::Delivered),
            _ => Err(NotificationDomainError::UnknownOutboxStatus(
                value.to_owned(),
            )),
        }
    }
}

/// Outcome of handing a notification to the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NotificationDelivery {
    /// The channel accepted the notification.
    Delivered,
    /// Delivery failed; the entry stays pending for a later drain.
    Deferred {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl NotificationDelivery {
    /// Returns whether the notification reached the channel.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Parameter object for reconstructing a persisted outbox entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOutboxEntryData {
    /// Persisted identifier.
    pub id: OutboxEntryId,
    /// Persisted payload.
    pub notification: Notification,
    /// Persisted delivery state.
    pub status: OutboxStatus,
    /// Persisted attempt count.
    pub attempts: u32,
    /// Persisted latest failure.
    pub last_error: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted delivery timestamp.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A notification queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxEntry {
    id: OutboxEntryId,
    notification: Notification,
    status: OutboxStatus,
    attempts: u32,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    /// Queues `notification` for delivery.
    #[must_use]
    pub fn pending(notification: Notification, clock: &impl Clock) -> Self {
        Self {
            id: OutboxEntryId::new(),
            notification,
            status: OutboxStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: clock.utc(),
            delivered_at: None,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOutboxEntryData) -> Self {
        Self {
            id: data.id,
            notification: data.notification,
            status: data.status,
            attempts: data.attempts,
            last_error: data.last_error,
            created_at: data.created_at,
            delivered_at: data.delivered_at,
        }
    }

    /// Records a successful delivery.
    pub const fn mark_delivered(&mut self, at: DateTime<Utc>) {
        self.status = OutboxStatus::Delivered;
        self.delivered_at = Some(at);
    }

    /// Records a failed attempt.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(error.into());
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> OutboxEntryId {
        self.id
    }

    /// Returns the queued notification.
    #[must_use]
    pub const fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Returns the idempotency key of the queued notification.
    #[must_use]
    pub const fn key(&self) -> NotificationKey {
        self.notification.key()
    }

    /// Returns the delivery state.
    #[must_use]
    pub const fn status(&self) -> OutboxStatus {
        self.status
    }

    /// Returns the number of failed attempts.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the latest failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the delivery timestamp.
    #[must_use]
    pub const fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }
}
