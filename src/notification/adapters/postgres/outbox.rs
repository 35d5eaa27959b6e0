//! `PostgreSQL` outbox implementation.

use super::models::OutboxRow;
use crate::notification::{
    domain::{
        Notification, NotificationKey, NotificationKind, OutboxEntry, OutboxEntryId,
        OutboxStatus, PersistedOutboxEntryData,
    },
    ports::{NotificationOutbox, NotificationOutboxError, NotificationOutboxResult},
};
use crate::project::domain::ProjectId;
use crate::shared::{UserId, WriteOutcome};
use crate::storage::{PgPool, run_blocking_with, schema::notification_outbox};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed outbox.
#[derive(Debug, Clone)]
pub struct PostgresNotificationOutbox {
    pool: PgPool,
}

impl PostgresNotificationOutbox {
    /// Creates an outbox from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> NotificationOutboxResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationOutboxResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, operation, NotificationOutboxError::persistence).await
    }
}

#[async_trait]
impl NotificationOutbox for PostgresNotificationOutbox {
    async fn pending(&self, limit: usize) -> NotificationOutboxResult<Vec<OutboxEntry>> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = notification_outbox::table
                .filter(notification_outbox::status.eq(OutboxStatus::Pending.as_str()))
                .order((
                    notification_outbox::created_at.asc(),
                    notification_outbox::id.asc(),
                ))
                .limit(row_limit)
                .select(OutboxRow::as_select())
                .load::<OutboxRow>(connection)
                .map_err(NotificationOutboxError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }

    async fn mark_delivered(
        &self,
        id: OutboxEntryId,
        at: DateTime<Utc>,
    ) -> NotificationOutboxResult<WriteOutcome> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                notification_outbox::table
                    .filter(notification_outbox::id.eq(id.into_inner()))
                    .filter(notification_outbox::status.eq(OutboxStatus::Pending.as_str())),
            )
            .set((
                notification_outbox::status.eq(OutboxStatus::Delivered.as_str()),
                notification_outbox::delivered_at.eq(Some(at)),
            ))
            .execute(connection)
            .map_err(NotificationOutboxError::persistence)?;

            if updated > 0 {
                return Ok(WriteOutcome::Applied);
            }
            ensure_exists(connection, id)?;
            Ok(WriteOutcome::Skipped)
        })
        .await
    }

    async fn record_failure(
        &self,
        id: OutboxEntryId,
        error: &str,
    ) -> NotificationOutboxResult<()> {
        let message = error.to_owned();
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                notification_outbox::table.filter(notification_outbox::id.eq(id.into_inner())),
            )
            .set((
                notification_outbox::attempts.eq(notification_outbox::attempts + 1),
                notification_outbox::last_error.eq(Some(message)),
            ))
            .execute(connection)
            .map_err(NotificationOutboxError::persistence)?;

            if updated == 0 {
                return Err(NotificationOutboxError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn ensure_exists(connection: &mut PgConnection, id: OutboxEntryId) -> NotificationOutboxResult<()> {
    let exists = diesel::select(diesel::dsl::exists(
        notification_outbox::table.filter(notification_outbox::id.eq(id.into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(NotificationOutboxError::persistence)?;
    if exists {
        Ok(())
    } else {
        Err(NotificationOutboxError::NotFound(id))
    }
}

fn row_to_entry(row: OutboxRow) -> NotificationOutboxResult<OutboxEntry> {
    let key = NotificationKey::parse(&row.dedupe_key)
        .map_err(NotificationOutboxError::invalid_persisted_data)?;
    let kind = NotificationKind::try_from(row.kind.as_str())
        .map_err(NotificationOutboxError::invalid_persisted_data)?;
    if kind != key.kind() {
        return Err(NotificationOutboxError::invalid_persisted_data(
            std::io::Error::other(format!(
                "outbox entry {} has kind {kind} but key {key}",
                row.id
            )),
        ));
    }
    let status = OutboxStatus::try_from(row.status.as_str())
        .map_err(NotificationOutboxError::invalid_persisted_data)?;
    let attempts =
        u32::try_from(row.attempts).map_err(NotificationOutboxError::invalid_persisted_data)?;

    let notification = Notification::from_parts(
        key,
        UserId::from_uuid(row.recipient_id),
        row.title,
        row.message,
        ProjectId::from_uuid(row.related_id),
    );
    Ok(OutboxEntry::from_persisted(PersistedOutboxEntryData {
        id: OutboxEntryId::from_uuid(row.id),
        notification,
        status,
        attempts,
        last_error: row.last_error,
        created_at: row.created_at,
        delivered_at: row.delivered_at,
    }))
}
