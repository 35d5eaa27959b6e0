//! Outbox-fed notification dispatcher.

use crate::config::MarketplaceConfig;
use crate::deadline::{self, DeadlineElapsed};
use crate::error::ErrorKind;
use crate::notification::{
    domain::{Notification, NotificationDelivery, OutboxEntry},
    ports::{
        NotificationChannel, NotificationChannelError, NotificationOutbox,
        NotificationOutboxError, NotificationOutboxResult,
    },
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while delivering notifications or reading the outbox.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The channel failed.
    #[error(transparent)]
    Channel(#[from] NotificationChannelError),
    /// The outbox store failed.
    #[error(transparent)]
    Outbox(#[from] NotificationOutboxError),
    /// A channel or outbox call exceeded its bound.
    #[error(transparent)]
    Timeout(#[from] DeadlineElapsed),
}

impl NotificationError {
    /// Classifies the error on the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Outbox(NotificationOutboxError::NotFound(_)) => ErrorKind::NotFound,
            Self::Channel(_) | Self::Outbox(_) => ErrorKind::TransientStore,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

/// Counts from one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries delivered during the pass.
    pub delivered: usize,
    /// Entries left pending after a failed attempt.
    pub deferred: usize,
}

/// Delivers outbox entries through a notification channel.
pub struct NotificationDispatcher<Ch, O, C>
where
    Ch: NotificationChannel,
    O: NotificationOutbox,
    C: Clock + Send + Sync,
{
    channel: Arc<Ch>,
    outbox: Arc<O>,
    clock: Arc<C>,
    config: MarketplaceConfig,
}

impl<Ch, O, C> Clone for NotificationDispatcher<Ch, O, C>
where
    Ch: NotificationChannel,
    O: NotificationOutbox,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            outbox: Arc::clone(&self.outbox),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<Ch, O, C> NotificationDispatcher<Ch, O, C>
where
    Ch: NotificationChannel,
    O: NotificationOutbox,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(
        channel: Arc<Ch>,
        outbox: Arc<O>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            channel,
            outbox,
            clock,
            config,
        }
    }

    /// Hands `notification` to the channel under the notification timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Channel`] when the channel fails and
    /// [`NotificationError::Timeout`] when it does not answer in time.
    pub async fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        deadline::within(
            "notification.deliver",
            self.config.notification_timeout,
            self.channel.deliver(notification),
        )
        .await??;
        Ok(())
    }

    async fn bounded_outbox<T, F>(
        &self,
        operation: &'static str,
        future: F,
    ) -> Result<T, NotificationError>
    where
        F: Future<Output = NotificationOutboxResult<T>>,
    {
        let result = deadline::within(operation, self.config.store_timeout, future).await?;
        Ok(result?)
    }

    /// Delivers one outbox entry and settles it.
    ///
    /// Never fails: a delivery error is recorded on the entry and reported
    /// as [`NotificationDelivery::Deferred`]. If the channel accepted the
    /// notification but the entry could not be marked, the entry stays
    /// pending and a later drain re-delivers it under the same key.
    pub async fn dispatch(&self, entry: &OutboxEntry) -> NotificationDelivery {
        let key = entry.key();
        match self.notify(entry.notification()).await {
            Ok(()) => {
                let delivered_at = self.clock.utc();
                let marked = self
                    .bounded_outbox(
                        "outbox.mark_delivered",
                        self.outbox.mark_delivered(entry.id(), delivered_at),
                    )
                    .await;
                match marked {
                    Ok(_) => tracing::debug!(%key, "notification delivered"),
                    Err(err) => {
                        tracing::warn!(%key, error = %err, "delivered notification left pending");
                    }
                }
                NotificationDelivery::Delivered
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(%key, error = %reason, "notification delivery deferred");
                let recorded = self
                    .bounded_outbox(
                        "outbox.record_failure",
                        self.outbox.record_failure(entry.id(), &reason),
                    )
                    .await;
                if let Err(record_err) = recorded {
                    tracing::warn!(%key, error = %record_err, "failed to record delivery attempt");
                }
                NotificationDelivery::Deferred { reason }
            }
        }
    }

    /// Re-delivers up to `limit` pending entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] only when the pending entries cannot be
    /// read; individual delivery failures are counted as deferred.
    pub async fn drain_pending(&self, limit: usize) -> Result<DrainReport, NotificationError> {
        let entries = self
            .bounded_outbox("outbox.pending", self.outbox.pending(limit))
            .await?;

        let mut report = DrainReport::default();
        for entry in &entries {
            if self.dispatch(entry).await.is_delivered() {
                report.delivered = report.delivered.saturating_add(1);
            } else {
                report.deferred = report.deferred.saturating_add(1);
            }
        }
        if !entries.is_empty() {
            tracing::info!(
                delivered = report.delivered,
                deferred = report.deferred,
                "outbox drain pass finished"
            );
        }
        Ok(report)
    }
}
