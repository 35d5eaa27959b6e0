//! When steps for bidding lifecycle BDD scenarios.

use super::world::{BiddingWorld, run_async};
use bidboard::application::{domain::Decision, services::SubmitApplicationRequest};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("a coder applies with a bid of {cents:u32} cents")]
fn coder_applies(world: &mut BiddingWorld, cents: u32) -> Result<(), eyre::Report> {
    let request = SubmitApplicationRequest::new(world.project()?.id(), world.coder)
        .with_bid(i64::from(cents));
    let result = run_async(world.ledger.submit(request));
    if let Ok(ref application) = result {
        world.application = Some(application.clone());
    }
    world.last_submission = Some(result);
    Ok(())
}

fn decide(world: &mut BiddingWorld, decision: Decision) -> Result<(), eyre::Report> {
    let application_id = world.application()?.id();
    let result = run_async(world.ledger.decide(application_id, world.hirer, decision));
    if let Ok(ref receipt) = result {
        world.application = Some(receipt.application.clone());
    }
    world.last_decision = Some(result);
    Ok(())
}

#[when("the hirer accepts the application")]
fn hirer_accepts(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    decide(world, Decision::Accept)
}

#[when("the hirer rejects the application")]
fn hirer_rejects(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    decide(world, Decision::Reject)
}

#[when("the notification channel recovers and the outbox is drained")]
fn channel_recovers(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    world
        .channel
        .set_unavailable(false)
        .wrap_err("bring channel back")?;
    run_async(world.dispatcher.drain_pending(10)).wrap_err("drain outbox")?;
    Ok(())
}
