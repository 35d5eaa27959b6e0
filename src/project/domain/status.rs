//! Project lifecycle status and its transition rules.

use super::ParseProjectStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
///
/// `Open` is the pre-payment listing status written by the first schema
/// version. New projects never enter it, but stored rows may still carry
/// it and it remains biddable without a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Created by the hirer and awaiting payment.
    Draft,
    /// Listed for bids without a bidding window.
    Open,
    /// Paid and accepting bids until the window ends.
    Active,
    /// A hire was made and work is under way.
    InProgress,
    /// Bidding has ended without work starting.
    Closed,
    /// Work finished.
    Completed,
    /// Withdrawn by the hirer.
    Cancelled,
}

impl ProjectStatus {
    /// All statuses in schema order.
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Open,
        Self::Active,
        Self::InProgress,
        Self::Closed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the status admits new applications, before any
    /// bidding window is considered.
    #[must_use]
    pub const fn accepts_bids(self) -> bool {
        matches!(self, Self::Open | Self::Active)
    }

    /// Returns whether payment confirmation may activate a project in this
    /// status.
    #[must_use]
    pub const fn can_activate(self) -> bool {
        matches!(self, Self::Draft | Self::Open)
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Active | Self::Cancelled)
                | (
                    Self::Open,
                    Self::Active | Self::InProgress | Self::Cancelled
                )
                | (
                    Self::Active,
                    Self::Closed | Self::InProgress | Self::Cancelled
                )
                | (Self::Closed, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseProjectStatusError(value.to_owned()))
    }
}
