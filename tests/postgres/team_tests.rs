//! Team name uniqueness against `PostgreSQL`.

use super::helpers::{BoxError, test_pool};
use bidboard::shared::UserId;
use bidboard::team::{
    adapters::postgres::PostgresTeamRepository,
    domain::{NewTeam, Team, TeamName},
    ports::{TeamRepository, TeamRepositoryError},
};
use mockable::DefaultClock;
use uuid::Uuid;

fn team(owner_id: UserId, name: &str) -> Result<Team, BoxError> {
    Ok(Team::new(
        NewTeam {
            name: TeamName::new(name)?,
            description: None,
            owner_id,
        },
        &DefaultClock,
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn team_names_collide_ignoring_case() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresTeamRepository::new(pool);
    let name = format!("Crew {}", Uuid::new_v4().simple());
    let original = team(UserId::new(), &name)?;
    repository.store(&original).await?;

    let shouting = team(UserId::new(), &name.to_uppercase())?;
    let result = repository.store(&shouting).await;

    assert!(matches!(
        result,
        Err(TeamRepositoryError::DuplicateTeamName(_))
    ));
    let by_owner = repository.find_by_owner(original.owner_id()).await?;
    assert_eq!(by_owner.map(|found| found.id()), Some(original.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn an_owner_has_at_most_one_team() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresTeamRepository::new(pool);
    let owner = UserId::new();
    repository
        .store(&team(owner, &format!("First {}", Uuid::new_v4().simple()))?)
        .await?;

    let result = repository
        .store(&team(owner, &format!("Second {}", Uuid::new_v4().simple()))?)
        .await;

    assert!(matches!(
        result,
        Err(TeamRepositoryError::OwnerAlreadyHasTeam(id)) if id == owner
    ));
    Ok(())
}
