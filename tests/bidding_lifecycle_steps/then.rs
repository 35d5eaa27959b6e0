//! Then steps for bidding lifecycle BDD scenarios.

use super::world::{BiddingWorld, run_async};
use bidboard::application::{domain::ApplicationStatus, services::ApplicationLedgerError};
use bidboard::error::ErrorKind;
use rstest_bdd_macros::then;

#[then(r#"the application is "{status}""#)]
fn application_status_is(world: &BiddingWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let application_id = world.application()?.id();
    let stored = run_async(world.ledger.find(application_id))?
        .ok_or_else(|| eyre::eyre!("application {application_id} not stored"))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the coder is notified that the application was "{verb}""#)]
fn coder_notified(world: &BiddingWorld, verb: String) -> Result<(), eyre::Report> {
    let project = world.project()?;
    let expected = format!(
        "Your application for project \"{}\" has been {verb}.",
        project.title()
    );
    let inbox = world.channel.delivered()?;
    let matching = inbox
        .iter()
        .filter(|notification| {
            notification.recipient_id() == world.coder && notification.message() == expected
        })
        .count();

    if matching != 1 {
        return Err(eyre::eyre!(
            "expected one notification '{expected}', inbox was {inbox:?}"
        ));
    }
    Ok(())
}

#[then("the submission is rejected because bidding is closed")]
fn submission_bidding_closed(world: &BiddingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_submission
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result"))?;

    if !matches!(result, Err(ApplicationLedgerError::BiddingClosed(_))) {
        return Err(eyre::eyre!("expected BiddingClosed error, got {result:?}"));
    }
    Ok(())
}

#[then("the hirer is warned that the notification was deferred")]
fn hirer_warned(world: &BiddingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_decision
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing decision result"))?;
    let receipt = result
        .as_ref()
        .map_err(|err| eyre::eyre!("decision failed: {err}"))?;

    if receipt.warning().is_none() {
        return Err(eyre::eyre!("expected a deferred-notification warning"));
    }
    Ok(())
}

#[then("the decision fails because the application is already decided")]
fn decision_already_decided(world: &BiddingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_decision
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing decision result"))?;

    match result {
        Err(err) if err.kind() == ErrorKind::InvalidState => Ok(()),
        other => Err(eyre::eyre!("expected an invalid-state error, got {other:?}")),
    }
}
