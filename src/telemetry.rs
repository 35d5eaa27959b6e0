//! Tracing subscriber setup for marketplace binaries.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`,
/// defaulting to `info`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
