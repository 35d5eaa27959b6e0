//! Shared world state for bidding lifecycle BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::ManualClock;
use bidboard::application::{
    adapters::memory::InMemoryApplicationRepository,
    domain::Application,
    services::{ApplicationLedgerError, ApplicationLedgerService, DecisionReceipt},
};
use bidboard::config::MarketplaceConfig;
use bidboard::notification::{
    adapters::memory::{InMemoryNotificationChannel, InMemoryNotificationOutbox},
    services::NotificationDispatcher,
};
use bidboard::project::{
    adapters::memory::InMemoryProjectRepository, domain::Project,
    services::ProjectLifecycleService,
};
use bidboard::shared::UserId;
use bidboard::team::{adapters::memory::InMemoryTeamRepository, services::TeamService};
use chrono::Utc;
use rstest::fixture;

/// Project service used by the BDD world.
pub type TestLifecycle =
    ProjectLifecycleService<InMemoryProjectRepository, InMemoryApplicationRepository, ManualClock>;

/// Ledger service used by the BDD world.
pub type TestLedger = ApplicationLedgerService<
    InMemoryApplicationRepository,
    InMemoryProjectRepository,
    InMemoryTeamRepository,
    InMemoryNotificationChannel,
    InMemoryNotificationOutbox,
    ManualClock,
>;

/// Dispatcher used by the BDD world.
pub type TestDispatcher =
    NotificationDispatcher<InMemoryNotificationChannel, InMemoryNotificationOutbox, ManualClock>;

/// Scenario world for bidding lifecycle behaviour tests.
pub struct BiddingWorld {
    pub clock: ManualClock,
    pub projects: TestLifecycle,
    pub ledger: TestLedger,
    pub dispatcher: TestDispatcher,
    pub channel: InMemoryNotificationChannel,
    pub hirer: UserId,
    pub coder: UserId,
    pub project: Option<Project>,
    pub application: Option<Application>,
    pub last_submission: Option<Result<Application, ApplicationLedgerError>>,
    pub last_decision: Option<Result<DecisionReceipt, ApplicationLedgerError>>,
}

impl BiddingWorld {
    /// Creates a world over fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let config = MarketplaceConfig::default();
        let clock = ManualClock::starting_at(Utc::now());
        let shared_clock = Arc::new(clock.clone());
        let channel = InMemoryNotificationChannel::new();
        let outbox = InMemoryNotificationOutbox::new();
        let project_repo = Arc::new(InMemoryProjectRepository::new());
        let application_repo =
            Arc::new(InMemoryApplicationRepository::with_outbox(outbox.clone()));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(channel.clone()),
            Arc::new(outbox),
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
            TeamService::new(
                Arc::new(InMemoryTeamRepository::new()),
                Arc::clone(&shared_clock),
                config.clone(),
            ),
            dispatcher.clone(),
            shared_clock,
            config,
        );

        Self {
            clock,
            projects,
            ledger,
            dispatcher,
            channel,
            hirer: UserId::new(),
            coder: UserId::new(),
            project: None,
            application: None,
            last_submission: None,
            last_decision: None,
        }
    }

    /// Returns the project created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was created.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the application submitted by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no application was submitted.
    pub fn application(&self) -> Result<&Application, eyre::Report> {
        self.application
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing application in scenario world"))
    }
}

impl Default for BiddingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BiddingWorld {
    BiddingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
