//! Deferred notifications and outbox draining.

use super::helpers::{BoxError, Marketplace, marketplace};
use bidboard::application::domain::{ApplicationStatus, Decision};
use bidboard::notification::domain::{NotificationKind, OutboxStatus};
use bidboard::shared::UserId;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outage_defers_notification_until_the_next_drain(
    marketplace: Marketplace,
) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let project = marketplace.paid_project(hirer, "Mailer").await?;
    let application = marketplace.bid(&project, 20_000).await?;
    marketplace.channel.set_unavailable(true)?;

    let receipt = marketplace
        .ledger
        .decide(application.id(), hirer, Decision::Reject)
        .await?;
    assert_eq!(receipt.application.status(), ApplicationStatus::Rejected);
    assert!(receipt.warning().is_some());
    assert!(marketplace.channel.delivered()?.is_empty());

    let during_outage = marketplace.dispatcher.drain_pending(10).await?;
    assert_eq!(during_outage.deferred, 1);

    marketplace.channel.set_unavailable(false)?;
    let recovered = marketplace.dispatcher.drain_pending(10).await?;
    assert_eq!(recovered.delivered, 1);

    let inbox = marketplace.channel.delivered()?;
    assert_eq!(inbox.len(), 1);
    assert!(
        inbox
            .iter()
            .all(|notification| notification.kind() == NotificationKind::Rejected)
    );
    let entries = marketplace.outbox.entries()?;
    assert!(entries.iter().all(|entry| {
        entry.status() == OutboxStatus::Delivered && entry.attempts() == 2
    }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drain_respects_the_batch_limit(marketplace: Marketplace) -> Result<(), BoxError> {
    let hirer = UserId::new();
    let project = marketplace.paid_project(hirer, "Scheduler").await?;
    marketplace.channel.set_unavailable(true)?;
    for cents in [1_000, 2_000, 3_000] {
        let application = marketplace.bid(&project, cents).await?;
        marketplace
            .ledger
            .decide(application.id(), hirer, Decision::Reject)
            .await?;
    }
    marketplace.channel.set_unavailable(false)?;

    let first = marketplace.dispatcher.drain_pending(2).await?;
    let second = marketplace.dispatcher.drain_pending(2).await?;
    let third = marketplace.dispatcher.drain_pending(2).await?;

    assert_eq!(first.delivered, 2);
    assert_eq!(second.delivered, 1);
    assert_eq!(third.delivered, 0);
    assert_eq!(marketplace.channel.delivered()?.len(), 3);
    Ok(())
}
