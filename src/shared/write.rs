//! Outcome of conditional store writes.

/// Result of a write guarded by a precondition on stored state.
///
/// Stores evaluate the guard and the write as a single atomic statement,
/// so exactly one of several concurrent writers observes
/// [`WriteOutcome::Applied`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// The guard held and the row was updated.
    Applied,
    /// The guard did not hold; nothing changed.
    Skipped,
}

impl WriteOutcome {
    /// Returns whether the write was applied.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Maps an affected-row count onto an outcome.
    #[must_use]
    pub const fn from_affected_rows(rows: usize) -> Self {
        if rows == 0 { Self::Skipped } else { Self::Applied }
    }
}
