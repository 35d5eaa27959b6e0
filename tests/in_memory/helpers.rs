//! Shared wiring for in-memory marketplace integration tests.

use crate::test_helpers::ManualClock;
use bidboard::application::{
    adapters::memory::InMemoryApplicationRepository,
    domain::Application,
    services::{ApplicationLedgerService, SubmitApplicationRequest},
};
use bidboard::config::MarketplaceConfig;
use bidboard::notification::{
    adapters::memory::{InMemoryNotificationChannel, InMemoryNotificationOutbox},
    services::NotificationDispatcher,
};
use bidboard::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::Project,
    services::{CreateDraftRequest, ProjectLifecycleService},
};
use bidboard::shared::UserId;
use bidboard::team::{adapters::memory::InMemoryTeamRepository, services::TeamService};
use chrono::{DateTime, Utc};
use rstest::fixture;
use std::sync::Arc;

/// Boxed error type for fallible test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Project service over in-memory adapters.
pub type Lifecycle =
    ProjectLifecycleService<InMemoryProjectRepository, InMemoryApplicationRepository, ManualClock>;

/// Ledger service over in-memory adapters.
pub type Ledger = ApplicationLedgerService<
    InMemoryApplicationRepository,
    InMemoryProjectRepository,
    InMemoryTeamRepository,
    InMemoryNotificationChannel,
    InMemoryNotificationOutbox,
    ManualClock,
>;

/// Dispatcher over in-memory adapters.
pub type Dispatcher =
    NotificationDispatcher<InMemoryNotificationChannel, InMemoryNotificationOutbox, ManualClock>;

/// A fully wired in-memory marketplace sharing one manual clock.
#[derive(Clone)]
pub struct Marketplace {
    /// Clock shared by every service.
    pub clock: ManualClock,
    /// Project lifecycle service.
    pub projects: Lifecycle,
    /// Application ledger service.
    pub ledger: Ledger,
    /// Team registry.
    pub teams: TeamService<InMemoryTeamRepository, ManualClock>,
    /// Outbox dispatcher.
    pub dispatcher: Dispatcher,
    /// Channel handle for failure injection and inspection.
    pub channel: InMemoryNotificationChannel,
    /// Outbox handle for inspection.
    pub outbox: InMemoryNotificationOutbox,
}

impl Marketplace {
    /// Wires a marketplace with `config`, its clock starting at `start`.
    #[must_use]
    pub fn new(config: &MarketplaceConfig, start: DateTime<Utc>) -> Self {
        let clock = ManualClock::starting_at(start);
        let shared_clock = Arc::new(clock.clone());
        let channel = InMemoryNotificationChannel::new();
        let outbox = InMemoryNotificationOutbox::new();
        let project_repo = Arc::new(InMemoryProjectRepository::new());
        let application_repo =
            Arc::new(InMemoryApplicationRepository::with_outbox(outbox.clone()));
        let teams = TeamService::new(
            Arc::new(InMemoryTeamRepository::new()),
            Arc::clone(&shared_clock),
            config.clone(),
        );
        let dispatcher = NotificationDispatcher::new(
            Arc::new(channel.clone()),
            Arc::new(outbox.clone()),
            Arc::clone(&shared_clock),
            config.clone(),
        );
        let projects = ProjectLifecycleService::new(
            Arc::clone(&project_repo),
            Arc::clone(&application_repo),
            Arc::clone(&shared_clock),
            config.clone(),
        );
        let ledger = ApplicationLedgerService::new(
            application_repo,
            project_repo,
            teams.clone(),
            dispatcher.clone(),
            shared_clock,
            config.clone(),
        );
        Self {
            clock,
            projects,
            ledger,
            teams,
            dispatcher,
            channel,
            outbox,
        }
    }

    /// Creates a draft and confirms its payment.
    ///
    /// # Errors
    ///
    /// Returns an error if either step fails.
    pub async fn paid_project(&self, hirer: UserId, title: &str) -> Result<Project, BoxError> {
        let draft = self
            .projects
            .create_draft(CreateDraftRequest::new(
                hirer,
                title,
                "Scope agreed with the hirer",
            ))
            .await?;
        Ok(self.projects.confirm_payment(draft.id()).await?)
    }

    /// Submits an individual bid from a fresh coder.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is rejected.
    pub async fn bid(&self, project: &Project, cents: i64) -> Result<Application, BoxError> {
        Ok(self
            .ledger
            .submit(SubmitApplicationRequest::new(project.id(), UserId::new()).with_bid(cents))
            .await?)
    }
}

/// Provides a marketplace with default configuration.
#[fixture]
pub fn marketplace() -> Marketplace {
    Marketplace::new(&MarketplaceConfig::default(), Utc::now())
}
