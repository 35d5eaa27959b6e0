//! Shared test helpers for `PostgreSQL` integration tests.

use bidboard::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{HirePreference, NewProject, Project, ProjectTitle},
    ports::ProjectRepository,
};
use bidboard::shared::UserId;
use bidboard::storage::{self, PgPool};
use mockable::DefaultClock;
use std::collections::BTreeSet;
use std::time::Duration;

/// Boxed error type for fallible test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the test database.
pub const DATABASE_URL_VAR: &str = "BIDBOARD_TEST_DATABASE_URL";

/// Connects to the test database and applies pending migrations.
///
/// Returns `None` when [`DATABASE_URL_VAR`] is unset.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or a migration fails.
pub async fn test_pool() -> Result<Option<PgPool>, BoxError> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        tracing::info!(var = DATABASE_URL_VAR, "unset; skipping PostgreSQL test");
        return Ok(None);
    };
    let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, BoxError> {
        let pool = storage::build_pool(&url, 4, Duration::from_secs(5))?;
        let mut connection = pool.get()?;
        storage::migrations::apply_pending(&mut connection)?;
        Ok(pool)
    })
    .await??;
    Ok(Some(pool))
}

/// Builds an unpaid draft owned by a fresh hirer.
///
/// # Errors
///
/// Returns an error if `title` is invalid.
pub fn draft(title: &str) -> Result<Project, BoxError> {
    Ok(Project::new_draft(
        NewProject {
            hirer_id: UserId::new(),
            title: ProjectTitle::new(title)?,
            description: String::from("Integration test project"),
            budget: None,
            timeline: None,
            required_skills: BTreeSet::new(),
            hire_preference: HirePreference::Either,
        },
        &DefaultClock,
    ))
}

/// Stores a fresh draft and returns it.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn stored_draft(pool: &PgPool, title: &str) -> Result<Project, BoxError> {
    let project = draft(title)?;
    PostgresProjectRepository::new(pool.clone())
        .store(&project)
        .await?;
    Ok(project)
}
