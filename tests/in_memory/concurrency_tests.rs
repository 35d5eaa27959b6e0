//! Racing requests against the in-memory adapters.

use super::helpers::{BoxError, Marketplace, marketplace};
use bidboard::application::{domain::Decision, services::SubmitApplicationRequest};
use bidboard::error::ErrorKind;
use bidboard::shared::UserId;
use rstest::rstest;
use std::collections::HashSet;

const RACERS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_by_one_applicant_admit_one(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let project = marketplace.paid_project(UserId::new(), "Chat Widget").await?;
    let coder = UserId::new();

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let ledger = marketplace.ledger.clone();
            let request = SubmitApplicationRequest::new(project.id(), coder);
            tokio::spawn(async move { ledger.submit(request).await })
        })
        .collect();

    let mut admitted = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => admitted += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::DuplicateApplication),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(marketplace.ledger.list_for_project(project.id()).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payment_confirmations_agree_on_one_deadline(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let draft = marketplace
        .projects
        .create_draft(bidboard::project::services::CreateDraftRequest::new(
            UserId::new(),
            "Geo Search",
            "Index venues by location",
        ))
        .await?;

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let projects = marketplace.projects.clone();
            let project_id = draft.id();
            tokio::spawn(async move { projects.confirm_payment(project_id).await })
        })
        .collect();

    let mut deadlines = HashSet::new();
    for handle in handles {
        let project = handle.await??;
        deadlines.insert(project.bidding_end_time());
    }
    assert_eq!(deadlines.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decisions_record_one_and_notify_once(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let project = marketplace.paid_project(hirer, "Inventory").await?;
    let application = marketplace.bid(&project, 70_000).await?;

    let handles: Vec<_> = [Decision::Accept, Decision::Reject]
        .into_iter()
        .cycle()
        .take(RACERS)
        .map(|decision| {
            let ledger = marketplace.ledger.clone();
            let application_id = application.id();
            tokio::spawn(async move { ledger.decide(application_id, hirer, decision).await })
        })
        .collect();

    let mut recorded = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => recorded += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::InvalidState),
        }
    }
    assert_eq!(recorded, 1);
    assert_eq!(marketplace.outbox.entries()?.len(), 1);
    assert_eq!(marketplace.channel.delivered()?.len(), 1);
    Ok(())
}
