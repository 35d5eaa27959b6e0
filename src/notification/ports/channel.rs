//! Delivery channel port.

use crate::notification::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for channel operations.
pub type NotificationChannelResult<T> = Result<T, NotificationChannelError>;

/// Transport that makes a notification visible to its recipient.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers `notification`.
    ///
    /// Implementations must be idempotent on the notification key:
    /// delivering the same key twice leaves one visible notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError`] when the transport fails.
    async fn deliver(&self, notification: &Notification) -> NotificationChannelResult<()>;
}

/// Errors returned by notification channels.
#[derive(Debug, Clone, Error)]
pub enum NotificationChannelError {
    /// The channel refused the notification.
    #[error("notification rejected: {0}")]
    Rejected(String),

    /// The underlying transport failed.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationChannelError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
