//! Drains the notification outbox into the `notifications` table.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://... outbox_dispatcher [--once]
//! ```
//!
//! Pending migrations are applied on start-up. The dispatcher then drains
//! up to `BIDBOARD_DRAIN_BATCH_SIZE` entries per pass, sleeping
//! `BIDBOARD_DRAIN_INTERVAL_MS` between passes. With `--once` it performs a
//! single pass and exits.

use bidboard::config::{ConfigError, MarketplaceConfig};
use bidboard::notification::{
    adapters::postgres::{PostgresNotificationChannel, PostgresNotificationOutbox},
    services::{NotificationDispatcher, NotificationError},
};
use bidboard::storage::{self, BlockingCallError, PgPool};
use bidboard::telemetry;
use diesel::r2d2::PoolError;
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Builder;

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const DRAIN_INTERVAL_MS_VAR: &str = "BIDBOARD_DRAIN_INTERVAL_MS";
const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_secs(5);
const POOL_SIZE: u32 = 4;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum DispatcherError {
    #[error("{0} is not set")]
    MissingDatabaseUrl(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid value '{value}' for {key}")]
    InvalidInterval { key: &'static str, value: String },
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Blocking(#[from] BlockingCallError),
    #[error("migration failed: {0}")]
    Migration(#[source] diesel::result::Error),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

fn main() -> Result<(), BoxError> {
    telemetry::init()?;
    let once = std::env::args().skip(1).any(|arg| arg == "--once");
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DispatcherError::Runtime)?;
    runtime.block_on(run(once)).map_err(Into::into)
}

async fn run(once: bool) -> Result<(), DispatcherError> {
    let database_url = std::env::var(DATABASE_URL_VAR)
        .map_err(|_| DispatcherError::MissingDatabaseUrl(DATABASE_URL_VAR))?;
    let config = MarketplaceConfig::from_env()?;
    let interval = drain_interval()?;

    let pool = storage::build_pool(&database_url, POOL_SIZE, config.store_timeout)?;
    migrate(&pool).await?;

    let dispatcher = NotificationDispatcher::new(
        Arc::new(PostgresNotificationChannel::new(pool.clone())),
        Arc::new(PostgresNotificationOutbox::new(pool)),
        Arc::new(DefaultClock),
        config.clone(),
    );

    loop {
        match dispatcher.drain_pending(config.drain_batch_size).await {
            Ok(report) => {
                tracing::debug!(
                    delivered = report.delivered,
                    deferred = report.deferred,
                    "drain pass complete"
                );
            }
            Err(err) if once => return Err(err.into()),
            Err(err) => tracing::warn!(error = %err, "drain pass failed"),
        }
        if once {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

async fn migrate(pool: &PgPool) -> Result<(), DispatcherError> {
    let applied = storage::run_blocking_with(
        pool,
        |connection| {
            storage::migrations::apply_pending(connection).map_err(DispatcherError::Migration)
        },
        DispatcherError::Blocking,
    )
    .await?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

fn drain_interval() -> Result<Duration, DispatcherError> {
    let Ok(raw) = std::env::var(DRAIN_INTERVAL_MS_VAR) else {
        return Ok(DEFAULT_DRAIN_INTERVAL);
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| DispatcherError::InvalidInterval {
            key: DRAIN_INTERVAL_MS_VAR,
            value: raw,
        })
}
