//! In-memory delivery channel with failure injection.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::notification::{
    domain::Notification,
    ports::{NotificationChannel, NotificationChannelError, NotificationChannelResult},
};

#[derive(Debug, Default)]
struct ChannelState {
    delivered: Vec<Notification>,
    attempts: usize,
    failures_remaining: usize,
    unavailable: bool,
    delay: Option<Duration>,
}

/// Channel that records deliveries in memory.
///
/// Deliveries are deduplicated on the notification key. Tests can make
/// the channel fail, either for the next `n` attempts or until switched
/// back, and can slow it down to exercise timeouts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationChannel {
    state: Arc<Mutex<ChannelState>>,
}

impl InMemoryNotificationChannel {
    /// Creates a healthy channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `attempts` deliveries fail.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError::Transport`] if the lock is
    /// poisoned.
    pub fn fail_next(&self, attempts: usize) -> NotificationChannelResult<()> {
        self.lock()?.failures_remaining = attempts;
        Ok(())
    }

    /// Makes every delivery fail until called again with `false`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError::Transport`] if the lock is
    /// poisoned.
    pub fn set_unavailable(&self, unavailable: bool) -> NotificationChannelResult<()> {
        self.lock()?.unavailable = unavailable;
        Ok(())
    }

    /// Delays every delivery by `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError::Transport`] if the lock is
    /// poisoned.
    pub fn set_delay(&self, delay: Duration) -> NotificationChannelResult<()> {
        self.lock()?.delay = Some(delay);
        Ok(())
    }

    /// Returns the distinct notifications delivered so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError::Transport`] if the lock is
    /// poisoned.
    pub fn delivered(&self) -> NotificationChannelResult<Vec<Notification>> {
        Ok(self.lock()?.delivered.clone())
    }

    /// Returns how many deliveries were attempted, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationChannelError::Transport`] if the lock is
    /// poisoned.
    pub fn attempts(&self) -> NotificationChannelResult<usize> {
        Ok(self.lock()?.attempts)
    }

    fn lock(&self) -> NotificationChannelResult<MutexGuard<'_, ChannelState>> {
        self.state.lock().map_err(|err| {
            NotificationChannelError::transport(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl NotificationChannel for InMemoryNotificationChannel {
    async fn deliver(&self, notification: &Notification) -> NotificationChannelResult<()> {
        let delay = self.lock()?.delay;
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }

        let mut state = self.lock()?;
        state.attempts = state.attempts.saturating_add(1);
        if state.unavailable || state.failures_remaining > 0 {
            state.failures_remaining = state.failures_remaining.saturating_sub(1);
            return Err(NotificationChannelError::Rejected(String::from(
                "simulated transport failure",
            )));
        }
        if !state
            .delivered
            .iter()
            .any(|existing| existing.key() == notification.key())
        {
            state.delivered.push(notification.clone());
        }
        Ok(())
    }
}
