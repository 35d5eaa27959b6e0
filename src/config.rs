//! Runtime configuration for marketplace services.

use chrono::TimeDelta;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the bidding window length in hours.
pub const BIDDING_WINDOW_HOURS_VAR: &str = "BIDBOARD_BIDDING_WINDOW_HOURS";
/// Longest bidding window accepted from the environment, in hours.
pub const MAX_BIDDING_WINDOW_HOURS: u32 = 5 * 365 * 24;
/// Environment variable holding the store call bound in milliseconds.
pub const STORE_TIMEOUT_MS_VAR: &str = "BIDBOARD_STORE_TIMEOUT_MS";
/// Environment variable holding the notification call bound in milliseconds.
pub const NOTIFICATION_TIMEOUT_MS_VAR: &str = "BIDBOARD_NOTIFICATION_TIMEOUT_MS";
/// Environment variable holding the outbox drain batch size.
pub const DRAIN_BATCH_SIZE_VAR: &str = "BIDBOARD_DRAIN_BATCH_SIZE";

/// Error returned when a configuration value cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value '{value}' for {key}")]
pub struct ConfigError {
    /// Offending variable name.
    pub key: &'static str,
    /// Raw value that failed to parse.
    pub value: String,
}

/// Tunables shared by the lifecycle, ledger, and dispatcher services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// Length of the bidding window opened by payment confirmation.
    pub bidding_window: TimeDelta,
    /// Upper bound on every store call.
    pub store_timeout: Duration,
    /// Upper bound on every notification channel call.
    pub notification_timeout: Duration,
    /// Maximum number of outbox entries handled per drain pass.
    pub drain_batch_size: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            bidding_window: TimeDelta::days(7),
            store_timeout: Duration::from_secs(5),
            notification_timeout: Duration::from_secs(3),
            drain_batch_size: 50,
        }
    }
}

impl MarketplaceConfig {
    /// Overrides the bidding window length.
    #[must_use]
    pub const fn with_bidding_window(mut self, window: TimeDelta) -> Self {
        self.bidding_window = window;
        self
    }

    /// Overrides the store call bound.
    #[must_use]
    pub const fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Overrides the notification channel call bound.
    #[must_use]
    pub const fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    /// Overrides the outbox drain batch size.
    #[must_use]
    pub const fn with_drain_batch_size(mut self, batch_size: usize) -> Self {
        self.drain_batch_size = batch_size;
        self
    }

    /// Builds a configuration from `BIDBOARD_*` environment variables,
    /// falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value does not parse, or when
    /// the bidding window is zero or longer than
    /// [`MAX_BIDDING_WINDOW_HOURS`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(hours) = parse_var::<u32>(&lookup, BIDDING_WINDOW_HOURS_VAR)? {
            if !(1..=MAX_BIDDING_WINDOW_HOURS).contains(&hours) {
                return Err(ConfigError {
                    key: BIDDING_WINDOW_HOURS_VAR,
                    value: hours.to_string(),
                });
            }
            config.bidding_window = TimeDelta::hours(i64::from(hours));
        }
        if let Some(millis) = parse_var::<u64>(&lookup, STORE_TIMEOUT_MS_VAR)? {
            config.store_timeout = Duration::from_millis(millis);
        }
        if let Some(millis) = parse_var::<u64>(&lookup, NOTIFICATION_TIMEOUT_MS_VAR)? {
            config.notification_timeout = Duration::from_millis(millis);
        }
        if let Some(batch_size) = parse_var::<usize>(&lookup, DRAIN_BATCH_SIZE_VAR)? {
            config.drain_batch_size = batch_size;
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError { key, value: raw })
}
