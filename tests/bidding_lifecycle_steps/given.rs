//! Given steps for bidding lifecycle BDD scenarios.

use super::world::{BiddingWorld, run_async};
use bidboard::application::{domain::Decision, services::SubmitApplicationRequest};
use bidboard::project::services::CreateDraftRequest;
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a hirer with a draft project titled "{title}""#)]
fn draft_project(world: &mut BiddingWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateDraftRequest::new(world.hirer, title, "Scope agreed on a call");
    let draft =
        run_async(world.projects.create_draft(request)).wrap_err("create draft project")?;
    world.project = Some(draft);
    Ok(())
}

#[given("the hirer has paid for the project")]
fn project_paid(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let active =
        run_async(world.projects.confirm_payment(project_id)).wrap_err("confirm payment")?;
    world.project = Some(active);
    Ok(())
}

#[given("{days:u32} days pass")]
fn days_pass(world: &mut BiddingWorld, days: u32) {
    world.clock.advance(TimeDelta::days(i64::from(days)));
}

#[given("a coder has applied")]
fn coder_applied(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    let request = SubmitApplicationRequest::new(world.project()?.id(), world.coder);
    let application = run_async(world.ledger.submit(request)).wrap_err("submit application")?;
    world.application = Some(application);
    Ok(())
}

#[given("the notification channel is down")]
fn channel_down(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    world
        .channel
        .set_unavailable(true)
        .wrap_err("take channel down")
}

#[given("the hirer has accepted the application")]
fn application_accepted(world: &mut BiddingWorld) -> Result<(), eyre::Report> {
    let application_id = world.application()?.id();
    let receipt = run_async(world.ledger.decide(application_id, world.hirer, Decision::Accept))
        .wrap_err("accept application in scenario setup")?;
    world.application = Some(receipt.application);
    Ok(())
}
