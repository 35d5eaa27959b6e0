//! Guarded project writes against `PostgreSQL`.

use super::helpers::{BoxError, stored_draft, test_pool};
use bidboard::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Activation, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError, StatusTransition},
};
use bidboard::shared::WriteOutcome;
use chrono::{SubsecRound, TimeDelta, Utc};

#[tokio::test(flavor = "multi_thread")]
async fn activation_applies_once_and_keeps_the_deadline() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresProjectRepository::new(pool.clone());
    let project = stored_draft(&pool, "Activation").await?;
    let now = Utc::now().trunc_subsecs(6);

    let first = Activation::starting_at(now, TimeDelta::days(7));
    let second = Activation::starting_at(now + TimeDelta::hours(1), TimeDelta::days(7));
    assert_eq!(
        repository.activate(project.id(), &first).await?,
        WriteOutcome::Applied
    );
    assert_eq!(
        repository.activate(project.id(), &second).await?,
        WriteOutcome::Skipped
    );

    let stored = repository
        .find_by_id(project.id())
        .await?
        .ok_or("project should exist")?;
    assert_eq!(stored.status(), ProjectStatus::Active);
    assert!(stored.is_paid());
    assert_eq!(stored.bidding_end_time(), Some(first.window().ends_at()));

    let biddable = repository.list_accepting_bids(Utc::now()).await?;
    assert!(biddable.iter().any(|listed| listed.id() == project.id()));
    let later = repository
        .list_accepting_bids(first.window().ends_at())
        .await?;
    assert!(later.iter().all(|listed| listed.id() != project.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn transition_compares_and_sets() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresProjectRepository::new(pool.clone());
    let project = stored_draft(&pool, "Transition").await?;
    let at = Utc::now();

    let stale = StatusTransition {
        expected: ProjectStatus::Active,
        target: ProjectStatus::Cancelled,
        at,
    };
    assert_eq!(
        repository.transition_status(project.id(), stale).await?,
        WriteOutcome::Skipped
    );
    let fresh = StatusTransition {
        expected: ProjectStatus::Draft,
        ..stale
    };
    assert_eq!(
        repository.transition_status(project.id(), fresh).await?,
        WriteOutcome::Applied
    );

    let hirer_projects = repository.list_by_hirer(project.hirer_id()).await?;
    assert_eq!(hirer_projects.len(), 1);
    assert!(
        hirer_projects
            .iter()
            .all(|listed| listed.status() == ProjectStatus::Cancelled)
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_store_and_unknown_ids_are_reported() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresProjectRepository::new(pool.clone());
    let project = stored_draft(&pool, "Duplicate").await?;

    let duplicate = repository.store(&project).await;
    assert!(matches!(
        duplicate,
        Err(ProjectRepositoryError::DuplicateProject(id)) if id == project.id()
    ));

    let unknown = bidboard::project::domain::ProjectId::new();
    let missing = repository
        .activate(unknown, &Activation::starting_at(Utc::now(), TimeDelta::days(7)))
        .await;
    assert!(matches!(
        missing,
        Err(ProjectRepositoryError::NotFound(id)) if id == unknown
    ));
    Ok(())
}
