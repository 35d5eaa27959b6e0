//! End-to-end flows from draft to completion.

use super::helpers::{BoxError, Marketplace, marketplace};
use bidboard::application::{
    domain::{ApplicationStatus, Decision},
    services::SubmitApplicationRequest,
};
use bidboard::error::ErrorKind;
use bidboard::notification::domain::{NotificationDelivery, NotificationKind};
use bidboard::project::{
    domain::ProjectStatus,
    services::{CreateDraftRequest, PaymentOutcome, PaymentReturn},
};
use bidboard::shared::UserId;
use bidboard::team::services::CreateTeamRequest;
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hirer_takes_a_project_from_draft_to_completion(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let coder = UserId::new();
    let project = marketplace.paid_project(hirer, "Website Redesign").await?;
    assert_eq!(
        project.bidding_end_time(),
        Some(marketplace.clock.utc() + TimeDelta::days(7))
    );

    let application = marketplace
        .ledger
        .submit(
            SubmitApplicationRequest::new(project.id(), coder)
                .with_bid(50_000)
                .with_experience_years(4)
                .with_message("Shipped similar sites for two agencies."),
        )
        .await?;
    let receipt = marketplace
        .ledger
        .decide(application.id(), hirer, Decision::Accept)
        .await?;
    assert_eq!(receipt.notification, NotificationDelivery::Delivered);

    let inbox = marketplace.channel.delivered()?;
    assert_eq!(inbox.len(), 1);
    assert!(inbox.iter().all(|notification| {
        notification.recipient_id() == coder && notification.kind() == NotificationKind::Accepted
    }));

    let started = marketplace.projects.start_work(project.id(), hirer).await?;
    assert_eq!(started.status(), ProjectStatus::InProgress);
    let completed = marketplace.projects.complete(project.id(), hirer).await?;
    assert_eq!(completed.status(), ProjectStatus::Completed);

    let history = marketplace.ledger.list_for_applicant(coder).await?;
    assert_eq!(history.len(), 1);
    assert!(
        history
            .iter()
            .all(|entry| entry.status() == ApplicationStatus::Accepted)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn payment_redirects_drive_activation(marketplace: Marketplace) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let draft = marketplace
        .projects
        .create_draft(CreateDraftRequest::new(hirer, "Data Import", "CSV to Postgres"))
        .await?;

    let cancelled = marketplace
        .projects
        .handle_payment_return(PaymentReturn::from_query(&format!(
            "?status=cancel&projectId={}",
            draft.id()
        )))
        .await?;
    assert_eq!(cancelled, PaymentOutcome::Cancelled(draft.id()));
    let still_draft = marketplace.projects.find(draft.id()).await?;
    assert_eq!(
        still_draft.map(|project| project.status()),
        Some(ProjectStatus::Draft)
    );

    let confirmed = marketplace
        .projects
        .handle_payment_return(PaymentReturn::from_query(&format!(
            "status=success&projectId={}",
            draft.id()
        )))
        .await?;
    let PaymentOutcome::Confirmed(active) = confirmed else {
        return Err("success redirect should confirm payment".into());
    };
    assert_eq!(active.status(), ProjectStatus::Active);

    let replayed = marketplace
        .projects
        .handle_payment_return(PaymentReturn::new("success", draft.id().to_string()))
        .await?;
    assert_eq!(replayed, PaymentOutcome::Confirmed(active));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_owner_bids_for_their_team(marketplace: Marketplace) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let owner = UserId::new();
    let project = marketplace.paid_project(hirer, "Search Service").await?;
    let team = marketplace
        .teams
        .create_team(CreateTeamRequest::new(owner, "Query Crew").with_description("Search people"))
        .await?;

    let duplicate_owner = marketplace
        .teams
        .create_team(CreateTeamRequest::new(owner, "Second Crew"))
        .await;
    assert!(duplicate_owner.is_err());

    let application = marketplace
        .ledger
        .submit(SubmitApplicationRequest::new(project.id(), owner).for_team(team.id()))
        .await?;
    assert_eq!(application.applicant().team_id(), Some(team.id()));

    let err = marketplace
        .ledger
        .submit(SubmitApplicationRequest::new(project.id(), owner))
        .await
        .expect_err("owner already applied through the team");
    assert_eq!(err.kind(), ErrorKind::DuplicateApplication);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn biddable_listing_is_newest_first(marketplace: Marketplace) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let older = marketplace.paid_project(hirer, "Older").await?;
    marketplace.clock.advance(TimeDelta::minutes(5));
    let newer = marketplace.paid_project(hirer, "Newer").await?;
    marketplace
        .projects
        .create_draft(CreateDraftRequest::new(hirer, "Unpaid", "Still a draft"))
        .await?;

    let listed = marketplace
        .projects
        .list_biddable(marketplace.clock.utc())
        .await?;

    let ids: Vec<_> = listed.iter().map(bidboard::project::domain::Project::id).collect();
    assert_eq!(ids, vec![newer.id(), older.id()]);
    assert_eq!(marketplace.projects.list_for_hirer(hirer).await?.len(), 3);
    Ok(())
}
