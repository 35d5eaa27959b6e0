//! Bidding window arithmetic.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Bidding window of an activated project.
///
/// The window closes at `ends_at`; applications are admitted strictly
/// before that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiddingWindow {
    ends_at: DateTime<Utc>,
}

impl BiddingWindow {
    /// Creates a window closing at `ends_at`.
    #[must_use]
    pub const fn closing_at(ends_at: DateTime<Utc>) -> Self {
        Self { ends_at }
    }

    /// Returns the closing instant.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Returns whether applications are admitted at `now`.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }

    /// Returns the time left at `now`, or `None` once closed.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.is_open(now).then(|| self.ends_at - now)
    }

    /// Renders a short countdown such as `Bidding ends in 2d 3h 15m`.
    #[must_use]
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        let Some(remaining) = self.remaining(now) else {
            return String::from("Bidding closed");
        };

        let total_minutes = remaining.num_minutes();
        let days = total_minutes.div_euclid(MINUTES_PER_DAY);
        let hours = total_minutes
            .rem_euclid(MINUTES_PER_DAY)
            .div_euclid(MINUTES_PER_HOUR);
        let minutes = total_minutes.rem_euclid(MINUTES_PER_HOUR);

        let parts: Vec<String> = [(days, 'd'), (hours, 'h'), (minutes, 'm')]
            .into_iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| format!("{value}{unit}"))
            .collect();

        if parts.is_empty() {
            return String::from("Bidding ends in less than 1m");
        }
        format!("Bidding ends in {}", parts.join(" "))
    }
}

/// Values written by a payment-driven activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    activated_at: DateTime<Utc>,
    window: BiddingWindow,
}

impl Activation {
    /// Computes an activation at `activated_at` opening a window of
    /// `window_length`. A window reaching past the last representable
    /// instant closes at [`DateTime::<Utc>::MAX_UTC`].
    #[must_use]
    pub fn starting_at(activated_at: DateTime<Utc>, window_length: TimeDelta) -> Self {
        let ends_at = activated_at
            .checked_add_signed(window_length)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            activated_at,
            window: BiddingWindow::closing_at(ends_at),
        }
    }

    /// Returns the activation timestamp.
    #[must_use]
    pub const fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    /// Returns the window opened by this activation.
    #[must_use]
    pub const fn window(&self) -> BiddingWindow {
        self.window
    }
}
