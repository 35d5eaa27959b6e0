//! Diesel row models for application persistence.

use crate::storage::schema::applications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for application records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Project applied to.
    pub project_id: uuid::Uuid,
    /// Applying user.
    pub applicant_id: uuid::Uuid,
    /// Applicant kind.
    pub applicant_kind: String,
    /// Team applied for.
    pub team_id: Option<uuid::Uuid>,
    /// Optional bid in minor units.
    pub bid_amount_cents: Option<i64>,
    /// Optional experience.
    pub experience_years: Option<i32>,
    /// Cover message.
    pub message: String,
    /// Review status.
    pub status: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
}

/// Insert model for application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Project applied to.
    pub project_id: uuid::Uuid,
    /// Applying user.
    pub applicant_id: uuid::Uuid,
    /// Applicant kind.
    pub applicant_kind: String,
    /// Team applied for.
    pub team_id: Option<uuid::Uuid>,
    /// Optional bid in minor units.
    pub bid_amount_cents: Option<i64>,
    /// Optional experience.
    pub experience_years: Option<i32>,
    /// Cover message.
    pub message: String,
    /// Review status.
    pub status: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
}
