//! Diesel row models for project persistence.

use crate::storage::schema::projects;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Owning hirer.
    pub hirer_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Optional budget in minor units.
    pub budget_cents: Option<i64>,
    /// Optional deadline.
    pub timeline: Option<NaiveDate>,
    /// Required skill identifiers.
    pub required_skills: Vec<uuid::Uuid>,
    /// Hire preference.
    pub hire_preference: String,
    /// Lifecycle status.
    pub status: String,
    /// Payment flag.
    pub paid: bool,
    /// Bidding deadline.
    pub bidding_end_time: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Owning hirer.
    pub hirer_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Optional budget in minor units.
    pub budget_cents: Option<i64>,
    /// Optional deadline.
    pub timeline: Option<NaiveDate>,
    /// Required skill identifiers.
    pub required_skills: Vec<uuid::Uuid>,
    /// Hire preference.
    pub hire_preference: String,
    /// Lifecycle status.
    pub status: String,
    /// Payment flag.
    pub paid: bool,
    /// Bidding deadline.
    pub bidding_end_time: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
