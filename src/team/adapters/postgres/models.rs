//! Diesel row models for team persistence.

use crate::storage::schema::teams;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for team records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning coder.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for team records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning coder.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
