//! `PostgreSQL` repository implementation for team storage.

use super::models::{NewTeamRow, TeamRow};
use crate::shared::UserId;
use crate::storage::{PgPool, run_blocking_with, schema::teams};
use crate::team::{
    domain::{PersistedTeamData, Team, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const TEAM_NAME_UNIQUE_INDEX: &str = "idx_teams_name_unique";
const TEAM_OWNER_UNIQUE_INDEX: &str = "idx_teams_owner_unique";

/// `PostgreSQL`-backed team repository.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> TeamRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TeamRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, operation, TeamRepositoryError::persistence).await
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()> {
        let name = team.name().clone();
        let owner_id = team.owner_id();
        let new_row = NewTeamRow {
            id: team.id().into_inner(),
            name: team.name().as_str().to_owned(),
            description: team.description().map(str::to_owned),
            owner_id: owner_id.into_inner(),
            created_at: team.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(teams::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &name, owner_id))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::id.eq(id.into_inner()))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(TeamRepositoryError::persistence)?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn find_by_owner(&self, owner_id: UserId) -> TeamRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::owner_id.eq(owner_id.into_inner()))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(TeamRepositoryError::persistence)?;
            row.map(row_to_team).transpose()
        })
        .await
    }
}

fn map_unique_violation(err: DieselError, name: &TeamName, owner_id: UserId) -> TeamRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(TEAM_NAME_UNIQUE_INDEX) =>
        {
            TeamRepositoryError::DuplicateTeamName(name.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(TEAM_OWNER_UNIQUE_INDEX) =>
        {
            TeamRepositoryError::OwnerAlreadyHasTeam(owner_id)
        }
        _ => TeamRepositoryError::persistence(err),
    }
}

fn row_to_team(row: TeamRow) -> TeamRepositoryResult<Team> {
    let name = TeamName::new(row.name).map_err(TeamRepositoryError::invalid_persisted_data)?;
    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(row.id),
        name,
        description: row.description,
        owner_id: UserId::from_uuid(row.owner_id),
        created_at: row.created_at,
    }))
}
