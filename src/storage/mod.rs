//! Shared `PostgreSQL` plumbing for the marketplace adapters.
//!
//! All bounded contexts live in one database so that a decision and its
//! outbox record can commit in the same transaction. This module owns the
//! Diesel schema, the connection pool type, the blocking-call helpers, and
//! the embedded SQL migrations.

mod blocking;
pub mod migrations;
pub mod schema;

pub use blocking::{BlockingCallError, PgPool, build_pool, run_blocking_with};
