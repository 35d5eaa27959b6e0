//! `PostgreSQL` notification channel writing to the `notifications` table.

use super::models::NewNotificationRow;
use crate::notification::{
    domain::Notification,
    ports::{NotificationChannel, NotificationChannelError, NotificationChannelResult},
};
use crate::storage::{PgPool, run_blocking_with, schema::notifications};
use async_trait::async_trait;
use diesel::prelude::*;

/// Channel that stores notifications for the recipient's inbox.
///
/// Inserts are keyed on `dedupe_key`; a repeated delivery is absorbed by
/// `ON CONFLICT DO NOTHING`.
#[derive(Debug, Clone)]
pub struct PostgresNotificationChannel {
    pool: PgPool,
}

impl PostgresNotificationChannel {
    /// Creates a channel from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationChannel for PostgresNotificationChannel {
    async fn deliver(&self, notification: &Notification) -> NotificationChannelResult<()> {
        let row = NewNotificationRow {
            id: uuid::Uuid::new_v4(),
            dedupe_key: notification.key().dedupe_key(),
            user_id: notification.recipient_id().into_inner(),
            title: notification.title().to_owned(),
            message: notification.message().to_owned(),
            kind: notification.kind().as_str().to_owned(),
            related_id: notification.related_id().into_inner(),
        };

        run_blocking_with(
            &self.pool,
            move |connection| {
                diesel::insert_into(notifications::table)
                    .values(&row)
                    .on_conflict(notifications::dedupe_key)
                    .do_nothing()
                    .execute(connection)
                    .map_err(NotificationChannelError::transport)?;
                Ok(())
            },
            NotificationChannelError::transport,
        )
        .await
    }
}
