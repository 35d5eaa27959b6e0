//! Outbox settlement and idempotent delivery against `PostgreSQL`.

use super::helpers::{BoxError, test_pool};
use bidboard::application::domain::ApplicationId;
use bidboard::notification::{
    adapters::postgres::{PostgresNotificationChannel, PostgresNotificationOutbox},
    domain::{Notification, NotificationKey, NotificationKind, OutboxEntryId},
    ports::{NotificationChannel, NotificationOutbox, NotificationOutboxError},
};
use bidboard::project::domain::{ProjectId, ProjectTitle};
use bidboard::shared::UserId;
use chrono::Utc;

#[tokio::test(flavor = "multi_thread")]
async fn redelivery_under_the_same_key_is_absorbed() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let channel = PostgresNotificationChannel::new(pool);
    let notification = Notification::for_decision(
        NotificationKey::new(ApplicationId::new(), NotificationKind::Accepted),
        UserId::new(),
        ProjectId::new(),
        &ProjectTitle::new("Redelivery")?,
    );

    channel.deliver(&notification).await?;
    channel.deliver(&notification).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn settling_unknown_entries_is_not_found() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let outbox = PostgresNotificationOutbox::new(pool);
    let unknown = OutboxEntryId::new();

    let marked = outbox.mark_delivered(unknown, Utc::now()).await;
    let failed = outbox.record_failure(unknown, "boom").await;

    assert!(matches!(marked, Err(NotificationOutboxError::NotFound(id)) if id == unknown));
    assert!(matches!(failed, Err(NotificationOutboxError::NotFound(id)) if id == unknown));
    Ok(())
}
