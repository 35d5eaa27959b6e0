//! Blocking operation helpers for `PostgreSQL` adapters.
//!
//! Diesel connections are synchronous; every adapter call is moved onto the
//! blocking thread pool so it never stalls the async executor.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Failure to obtain a connection or to join the blocking task.
#[derive(Debug, Error)]
pub enum BlockingCallError {
    /// No connection could be checked out of the pool in time.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a pool whose connection checkout waits at most
/// `acquire_timeout`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(
    database_url: &str,
    max_size: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(acquire_timeout)
        .build(manager)
}

/// Checks out a pooled connection and runs `operation` on the blocking
/// thread pool, mapping pool and join failures with `map_err`.
pub async fn run_blocking_with<F, T, E, M>(pool: &PgPool, operation: F, map_err: M) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: Fn(BlockingCallError) -> E + Send + Copy + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|err| map_err(BlockingCallError::Pool(err)))?;
        operation(&mut connection)
    })
    .await
    .map_err(|err| map_err(BlockingCallError::Join(err)))?
}
