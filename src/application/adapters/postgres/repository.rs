//! `PostgreSQL` repository implementation for application storage.

use super::models::{ApplicationRow, NewApplicationRow};
use crate::application::{
    domain::{
        Applicant, ApplicantKind, Application, ApplicationId, ApplicationStatus,
        ExperienceYears, PersistedApplicationData,
    },
    ports::{
        ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult,
        DecisionRecord,
    },
};
use crate::notification::adapters::postgres::new_outbox_row;
use crate::project::domain::ProjectId;
use crate::shared::{Amount, UserId, WriteOutcome};
use crate::storage::{
    PgPool, run_blocking_with,
    schema::{applications, notification_outbox},
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const PROJECT_APPLICANT_UNIQUE_INDEX: &str = "idx_applications_project_applicant";

impl From<DieselError> for ApplicationRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed application repository.
///
/// Decisions update `applications` and insert into `notification_outbox`
/// inside one transaction.
#[derive(Debug, Clone)]
pub struct PostgresApplicationRepository {
    pool: PgPool,
}

impl PostgresApplicationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> ApplicationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ApplicationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, operation, ApplicationRepositoryError::persistence).await
    }
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    async fn insert(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let project_id = application.project_id();
        let applicant_id = application.applicant_id();
        let new_row = to_new_row(application);

        self.run_blocking(move |connection| {
            diesel::insert_into(applications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(PROJECT_APPLICANT_UNIQUE_INDEX) =>
                    {
                        ApplicationRepositoryError::DuplicateApplication {
                            project_id,
                            applicant_id,
                        }
                    }
                    _ => ApplicationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        self.run_blocking(move |connection| {
            let row = applications::table
                .filter(applications::id.eq(id.into_inner()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn record_decision(
        &self,
        record: &DecisionRecord,
    ) -> ApplicationRepositoryResult<WriteOutcome> {
        let application_id = record.application_id;
        let status = record.decision.resulting_status();
        let decided_at = record.decided_at;
        let outbox_row = new_outbox_row(&record.outbox_entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, ApplicationRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    applications::table
                        .filter(applications::id.eq(application_id.into_inner()))
                        .filter(applications::status.eq(ApplicationStatus::Pending.as_str())),
                )
                .set((
                    applications::status.eq(status.as_str()),
                    applications::decided_at.eq(Some(decided_at)),
                ))
                .execute(tx)?;

                if updated == 0 {
                    let exists = diesel::select(diesel::dsl::exists(
                        applications::table
                            .filter(applications::id.eq(application_id.into_inner())),
                    ))
                    .get_result::<bool>(tx)?;
                    if !exists {
                        return Err(ApplicationRepositoryError::NotFound(application_id));
                    }
                    return Ok(WriteOutcome::Skipped);
                }

                diesel::insert_into(notification_outbox::table)
                    .values(&outbox_row)
                    .on_conflict(notification_outbox::dedupe_key)
                    .do_nothing()
                    .execute(tx)?;
                Ok(WriteOutcome::Applied)
            })
        })
        .await
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ApplicationRepositoryResult<Vec<Application>> {
        self.run_blocking(move |connection| {
            let rows = applications::table
                .filter(applications::project_id.eq(project_id.into_inner()))
                .order((applications::created_at.desc(), applications::id.asc()))
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Vec<Application>> {
        self.run_blocking(move |connection| {
            let rows = applications::table
                .filter(applications::applicant_id.eq(applicant_id.into_inner()))
                .order((applications::created_at.desc(), applications::id.asc()))
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }
}

fn to_new_row(application: &Application) -> NewApplicationRow {
    let applicant = application.applicant();
    NewApplicationRow {
        id: application.id().into_inner(),
        project_id: application.project_id().into_inner(),
        applicant_id: applicant.user_id().into_inner(),
        applicant_kind: applicant.kind().as_str().to_owned(),
        team_id: applicant.team_id().map(TeamId::into_inner),
        bid_amount_cents: application.bid_amount().map(Amount::minor_units),
        experience_years: application.experience_years().map(ExperienceYears::value),
        message: application.message().to_owned(),
        status: application.status().as_str().to_owned(),
        created_at: application.created_at(),
        decided_at: application.decided_at(),
    }
}

fn row_to_application(row: ApplicationRow) -> ApplicationRepositoryResult<Application> {
    let kind = ApplicantKind::try_from(row.applicant_kind.as_str())
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let applicant = Applicant::from_parts(
        kind,
        UserId::from_uuid(row.applicant_id),
        row.team_id.map(TeamId::from_uuid),
    )
    .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let bid_amount = row
        .bid_amount_cents
        .map(Amount::new)
        .transpose()
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let experience_years = row
        .experience_years
        .map(ExperienceYears::new)
        .transpose()
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;
    let status = ApplicationStatus::try_from(row.status.as_str())
        .map_err(ApplicationRepositoryError::invalid_persisted_data)?;

    Ok(Application::from_persisted(PersistedApplicationData {
        id: ApplicationId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        applicant,
        bid_amount,
        experience_years,
        message: row.message,
        status,
        created_at: row.created_at,
        decided_at: row.decided_at,
    }))
}
