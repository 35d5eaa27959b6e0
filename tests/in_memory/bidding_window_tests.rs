//! Bidding window expiry driven by a manual clock.

use super::helpers::{BoxError, Marketplace, marketplace};
use bidboard::application::{domain::Decision, services::ApplicationLedgerError};
use bidboard::error::ErrorKind;
use bidboard::project::domain::ProjectStatus;
use bidboard::shared::UserId;
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bids_are_admitted_strictly_before_the_deadline(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let project = marketplace.paid_project(UserId::new(), "Analytics").await?;

    marketplace
        .clock
        .advance(TimeDelta::days(7) - TimeDelta::seconds(1));
    marketplace.bid(&project, 10_000).await?;

    marketplace.clock.advance(TimeDelta::seconds(1));
    let err = marketplace
        .bid(&project, 10_000)
        .await
        .expect_err("bid at the deadline should be rejected");
    assert!(err.to_string().contains("bidding is closed"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn elapsed_window_reads_as_closed_and_leaves_the_listing(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let project = marketplace.paid_project(hirer, "Reporting").await?;
    marketplace.clock.advance(TimeDelta::days(8));

    let now = marketplace.clock.utc();
    let stored = marketplace
        .projects
        .find(project.id())
        .await?
        .ok_or("project should exist")?;
    assert_eq!(stored.status(), ProjectStatus::Active);
    assert_eq!(stored.effective_status(now), ProjectStatus::Closed);
    assert!(marketplace.projects.list_biddable(now).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_payment_confirmation_keeps_the_original_deadline(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let project = marketplace.paid_project(UserId::new(), "Billing").await?;
    let deadline = project.bidding_end_time();

    marketplace.clock.advance(TimeDelta::days(3));
    let replayed = marketplace.projects.confirm_payment(project.id()).await?;

    assert_eq!(replayed.bidding_end_time(), deadline);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn decisions_after_the_window(marketplace: Marketplace) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let project = marketplace.paid_project(hirer, "Payroll").await?;
    let keep = marketplace.bid(&project, 30_000).await?;
    let drop = marketplace.bid(&project, 45_000).await?;
    marketplace.clock.advance(TimeDelta::days(7));

    let err = marketplace
        .ledger
        .decide(keep.id(), hirer, Decision::Accept)
        .await
        .expect_err("acceptance needs an open window");
    assert!(matches!(err, ApplicationLedgerError::BiddingClosed(_)));
    assert_eq!(err.kind(), ErrorKind::BiddingClosed);

    let receipt = marketplace
        .ledger
        .decide(drop.id(), hirer, Decision::Reject)
        .await?;
    assert_eq!(receipt.warning(), None);

    let started = marketplace.projects.start_work(project.id(), hirer).await;
    assert!(started.is_err());
    Ok(())
}
