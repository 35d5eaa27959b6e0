//! Diesel row models for notifications and the outbox.

use crate::notification::domain::OutboxEntry;
use crate::storage::schema::{notification_outbox, notifications};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for outbox entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notification_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Idempotency key.
    pub dedupe_key: String,
    /// Recipient user.
    pub recipient_id: uuid::Uuid,
    /// Notification kind.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Related project.
    pub related_id: uuid::Uuid,
    /// Delivery status.
    pub status: String,
    /// Failed attempts so far.
    pub attempts: i32,
    /// Latest failure.
    pub last_error: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Delivery timestamp.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Insert model for outbox entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_outbox)]
pub struct NewOutboxRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Idempotency key.
    pub dedupe_key: String,
    /// Recipient user.
    pub recipient_id: uuid::Uuid,
    /// Notification kind.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Related project.
    pub related_id: uuid::Uuid,
    /// Delivery status.
    pub status: String,
    /// Failed attempts so far.
    pub attempts: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for delivered notifications.
///
/// `read` and `created_at` take their column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Idempotency key shared with the outbox entry.
    pub dedupe_key: String,
    /// Recipient user.
    pub user_id: uuid::Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Notification kind.
    pub kind: String,
    /// Related project.
    pub related_id: uuid::Uuid,
}

/// Builds the insert row for a freshly queued entry.
pub fn new_outbox_row(entry: &OutboxEntry) -> NewOutboxRow {
    let notification = entry.notification();
    NewOutboxRow {
        id: entry.id().into_inner(),
        dedupe_key: entry.key().dedupe_key(),
        recipient_id: notification.recipient_id().into_inner(),
        kind: notification.kind().as_str().to_owned(),
        title: notification.title().to_owned(),
        message: notification.message().to_owned(),
        related_id: notification.related_id().into_inner(),
        status: entry.status().as_str().to_owned(),
        attempts: i32::try_from(entry.attempts()).unwrap_or(i32::MAX),
        created_at: entry.created_at(),
    }
}
