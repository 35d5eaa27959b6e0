//! `PostgreSQL` repository implementation for project storage.

use super::models::{NewProjectRow, ProjectRow};
use crate::project::{
    domain::{
        Activation, HirePreference, PersistedProjectData, Project, ProjectId, ProjectStatus,
        ProjectTitle, SkillId,
    },
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, StatusTransition},
};
use crate::shared::{Amount, UserId, WriteOutcome};
use crate::storage::{PgPool, run_blocking_with, schema::projects};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const BIDDABLE_STATUSES: [&str; 2] = ["open", "active"];

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, operation, ProjectRepositoryError::persistence).await
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn activate(
        &self,
        id: ProjectId,
        activation: &Activation,
    ) -> ProjectRepositoryResult<WriteOutcome> {
        let bidding_end_time = activation.window().ends_at();
        let activated_at = activation.activated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::sql_query(concat!(
                "UPDATE projects SET status = 'active', paid = TRUE, ",
                "bidding_end_time = COALESCE(bidding_end_time, $2), updated_at = $3 ",
                "WHERE id = $1 AND status IN ('draft', 'open')",
            ))
            .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
            .bind::<diesel::sql_types::Timestamptz, _>(bidding_end_time)
            .bind::<diesel::sql_types::Timestamptz, _>(activated_at)
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;

            skipped_or_not_found(connection, id, updated)
        })
        .await
    }

    async fn transition_status(
        &self,
        id: ProjectId,
        transition: StatusTransition,
    ) -> ProjectRepositoryResult<WriteOutcome> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                projects::table
                    .filter(projects::id.eq(id.into_inner()))
                    .filter(projects::status.eq(transition.expected.as_str())),
            )
            .set((
                projects::status.eq(transition.target.as_str()),
                projects::updated_at.eq(transition.at),
            ))
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;

            skipped_or_not_found(connection, id, updated)
        })
        .await
    }

    async fn list_accepting_bids(
        &self,
        now: DateTime<Utc>,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::status.eq_any(BIDDABLE_STATUSES))
                .filter(
                    projects::bidding_end_time
                        .is_null()
                        .or(projects::bidding_end_time.gt(now)),
                )
                .order((projects::created_at.desc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn list_by_hirer(&self, hirer_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::hirer_id.eq(hirer_id.into_inner()))
                .order((projects::created_at.desc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }
}

/// Distinguishes a failed guard from a missing row after a conditional
/// update touched nothing.
fn skipped_or_not_found(
    connection: &mut PgConnection,
    id: ProjectId,
    updated: usize,
) -> ProjectRepositoryResult<WriteOutcome> {
    if updated > 0 {
        return Ok(WriteOutcome::Applied);
    }
    let exists = diesel::select(diesel::dsl::exists(
        projects::table.filter(projects::id.eq(id.into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(ProjectRepositoryError::persistence)?;

    if exists {
        Ok(WriteOutcome::Skipped)
    } else {
        Err(ProjectRepositoryError::NotFound(id))
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        hirer_id: project.hirer_id().into_inner(),
        title: project.title().as_str().to_owned(),
        description: project.description().to_owned(),
        budget_cents: project.budget().map(Amount::minor_units),
        timeline: project.timeline(),
        required_skills: project
            .required_skills()
            .iter()
            .map(|skill| skill.into_inner())
            .collect(),
        hire_preference: project.hire_preference().as_str().to_owned(),
        status: project.status().as_str().to_owned(),
        paid: project.is_paid(),
        bidding_end_time: project.bidding_end_time(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        hirer_id,
        title,
        description,
        budget_cents,
        timeline,
        required_skills,
        hire_preference,
        status,
        paid,
        bidding_end_time,
        created_at,
        updated_at,
    } = row;

    let parsed_title =
        ProjectTitle::new(title).map_err(ProjectRepositoryError::invalid_persisted_data)?;
    let parsed_budget = budget_cents
        .map(Amount::new)
        .transpose()
        .map_err(ProjectRepositoryError::invalid_persisted_data)?;
    let parsed_preference = HirePreference::try_from(hire_preference.as_str())
        .map_err(ProjectRepositoryError::invalid_persisted_data)?;
    let parsed_status = ProjectStatus::try_from(status.as_str())
        .map_err(ProjectRepositoryError::invalid_persisted_data)?;

    let data = PersistedProjectData {
        id: ProjectId::from_uuid(id),
        hirer_id: UserId::from_uuid(hirer_id),
        title: parsed_title,
        description,
        budget: parsed_budget,
        timeline,
        required_skills: required_skills.into_iter().map(SkillId::from_uuid).collect(),
        hire_preference: parsed_preference,
        status: parsed_status,
        paid,
        bidding_end_time,
        created_at,
        updated_at,
    };
    Ok(Project::from_persisted(data))
}
