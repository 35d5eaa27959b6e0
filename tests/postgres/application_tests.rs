//! Application uniqueness and atomic decisions against `PostgreSQL`.

use super::helpers::{BoxError, stored_draft, test_pool};
use bidboard::application::{
    adapters::postgres::PostgresApplicationRepository,
    domain::{Applicant, Application, ApplicationStatus, Decision, NewApplication},
    ports::{ApplicationRepository, ApplicationRepositoryError, DecisionRecord},
};
use bidboard::notification::{
    adapters::postgres::PostgresNotificationOutbox,
    domain::{Notification, NotificationKey, OutboxEntry},
    ports::NotificationOutbox,
};
use bidboard::project::domain::Project;
use bidboard::shared::{Amount, UserId, WriteOutcome};
use chrono::Utc;
use mockable::DefaultClock;

fn application_for(project: &Project, coder: UserId) -> Result<Application, BoxError> {
    Ok(Application::submit(
        NewApplication {
            project_id: project.id(),
            applicant: Applicant::Individual { coder_id: coder },
            bid_amount: Some(Amount::new(42_000)?),
            experience_years: None,
            message: String::from("Available next week."),
        },
        &DefaultClock,
    ))
}

fn decision_record(
    project: &Project,
    application: &Application,
    decision: Decision,
) -> DecisionRecord {
    let notification = Notification::for_decision(
        NotificationKey::new(application.id(), decision.into()),
        application.applicant_id(),
        project.id(),
        project.title(),
    );
    DecisionRecord {
        application_id: application.id(),
        decision,
        decided_at: Utc::now(),
        outbox_entry: OutboxEntry::pending(notification, &DefaultClock),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn one_application_per_applicant_and_project() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresApplicationRepository::new(pool.clone());
    let project = stored_draft(&pool, "Uniqueness").await?;
    let coder = UserId::new();
    let first = application_for(&project, coder)?;
    repository.insert(&first).await?;

    let second = application_for(&project, coder)?;
    let result = repository.insert(&second).await;

    assert!(matches!(
        result,
        Err(ApplicationRepositoryError::DuplicateApplication { .. })
    ));
    let stored = repository
        .find_by_id(first.id())
        .await?
        .ok_or("application should exist")?;
    assert_eq!(stored.bid_amount(), first.bid_amount());
    assert_eq!(stored.message(), "Available next week.");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn decision_and_outbox_entry_commit_together() -> Result<(), BoxError> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let repository = PostgresApplicationRepository::new(pool.clone());
    let outbox = PostgresNotificationOutbox::new(pool.clone());
    let project = stored_draft(&pool, "Decisions").await?;
    let application = application_for(&project, UserId::new())?;
    repository.insert(&application).await?;

    let accept = decision_record(&project, &application, Decision::Accept);
    assert_eq!(
        repository.record_decision(&accept).await?,
        WriteOutcome::Applied
    );
    let reject = decision_record(&project, &application, Decision::Reject);
    assert_eq!(
        repository.record_decision(&reject).await?,
        WriteOutcome::Skipped
    );

    let stored = repository
        .find_by_id(application.id())
        .await?
        .ok_or("application should exist")?;
    assert_eq!(stored.status(), ApplicationStatus::Accepted);
    assert!(stored.decided_at().is_some());

    let pending = outbox.pending(1_000).await?;
    assert!(pending.iter().any(|entry| entry.id() == accept.outbox_entry.id()));
    assert!(pending.iter().all(|entry| entry.id() != reject.outbox_entry.id()));

    let for_project = repository.list_for_project(project.id()).await?;
    assert_eq!(for_project.len(), 1);

    let delivered_at = Utc::now();
    let first = outbox
        .mark_delivered(accept.outbox_entry.id(), delivered_at)
        .await?;
    let second = outbox
        .mark_delivered(accept.outbox_entry.id(), delivered_at)
        .await?;
    assert_eq!(first, WriteOutcome::Applied);
    assert_eq!(second, WriteOutcome::Skipped);
    Ok(())
}
