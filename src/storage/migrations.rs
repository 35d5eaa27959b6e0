//! Embedded schema migrations.
//!
//! Migrations are applied in order and recorded in
//! `bidboard_schema_versions`, so re-running [`apply_pending`] only executes
//! versions the database has not seen.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// A single embedded migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Version identifier (the migration directory name).
    pub version: &'static str,
    /// Forward SQL.
    pub up: &'static str,
}

/// All migrations in application order.
pub const MIGRATIONS: [Migration; 3] = [
    Migration {
        version: "2026-09-01-000000_create_marketplace_tables",
        up: include_str!("../../migrations/2026-09-01-000000_create_marketplace_tables/up.sql"),
    },
    Migration {
        version: "2026-09-15-000000_add_paid_bidding_lifecycle",
        up: include_str!("../../migrations/2026-09-15-000000_add_paid_bidding_lifecycle/up.sql"),
    },
    Migration {
        version: "2026-09-20-000000_add_notification_outbox",
        up: include_str!("../../migrations/2026-09-20-000000_add_notification_outbox/up.sql"),
    },
];

const CREATE_VERSIONS_TABLE_SQL: &str = concat!(
    "CREATE TABLE IF NOT EXISTS bidboard_schema_versions (",
    "version VARCHAR(100) PRIMARY KEY, ",
    "applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
);

#[derive(QueryableByName)]
struct AppliedVersion {
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    version: String,
}

/// Applies every migration not yet recorded, each in its own transaction.
///
/// Returns the versions applied by this call.
///
/// # Errors
///
/// Returns the Diesel error of the first failing statement; the failing
/// migration is rolled back and later ones are not attempted.
pub fn apply_pending(connection: &mut PgConnection) -> QueryResult<Vec<&'static str>> {
    connection.batch_execute(CREATE_VERSIONS_TABLE_SQL)?;
    let applied: Vec<String> =
        diesel::sql_query("SELECT version FROM bidboard_schema_versions")
            .load::<AppliedVersion>(connection)?
            .into_iter()
            .map(|row| row.version)
            .collect();

    let mut newly_applied = Vec::new();
    for migration in MIGRATIONS {
        if applied.iter().any(|version| version == migration.version) {
            continue;
        }
        connection.transaction::<_, diesel::result::Error, _>(|tx| {
            tx.batch_execute(migration.up)?;
            diesel::sql_query("INSERT INTO bidboard_schema_versions (version) VALUES ($1)")
                .bind::<diesel::sql_types::Varchar, _>(migration.version)
                .execute(tx)?;
            Ok(())
        })?;
        tracing::info!(version = migration.version, "applied schema migration");
        newly_applied.push(migration.version);
    }
    Ok(newly_applied)
}
