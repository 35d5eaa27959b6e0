//! Bounded waiting for store and channel calls.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Error returned when an operation exceeds its time bound.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{operation} timed out after {limit:?}")]
pub struct DeadlineElapsed {
    /// Name of the operation that timed out.
    pub operation: &'static str,
    /// The bound that was exceeded.
    pub limit: Duration,
}

/// Awaits `future`, giving up after `limit`.
///
/// # Errors
///
/// Returns [`DeadlineElapsed`] when `future` does not complete in time.
pub async fn within<F, T>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<T, DeadlineElapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| DeadlineElapsed { operation, limit })
}
