//! Service layer for submitting and deciding applications.

use crate::application::{
    domain::{
        Applicant, ApplicantKind, Application, ApplicationDomainError, ApplicationId, Decision,
        ExperienceYears, NewApplication,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError, DecisionRecord},
};
use crate::config::MarketplaceConfig;
use crate::deadline::{self, DeadlineElapsed};
use crate::error::ErrorKind;
use crate::notification::{
    domain::{Notification, NotificationDelivery, NotificationKey, OutboxEntry},
    ports::{NotificationChannel, NotificationOutbox},
    services::NotificationDispatcher,
};
use crate::project::{
    domain::{Project, ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::shared::{Amount, UserId};
use crate::team::{
    domain::TeamId,
    ports::TeamRepository,
    services::{TeamService, TeamServiceError},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for submitting an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitApplicationRequest {
    project_id: ProjectId,
    applicant_id: UserId,
    applicant_kind: ApplicantKind,
    team_id: Option<TeamId>,
    bid_amount_cents: Option<i64>,
    experience_years: Option<i32>,
    message: String,
}

impl SubmitApplicationRequest {
    /// Creates an individual application with no bid and the default
    /// message.
    #[must_use]
    pub const fn new(project_id: ProjectId, applicant_id: UserId) -> Self {
        Self {
            project_id,
            applicant_id,
            applicant_kind: ApplicantKind::Individual,
            team_id: None,
            bid_amount_cents: None,
            experience_years: None,
            message: String::new(),
        }
    }

    /// Applies on behalf of `team_id`, which the applicant must own.
    #[must_use]
    pub const fn for_team(mut self, team_id: TeamId) -> Self {
        self.applicant_kind = ApplicantKind::Team;
        self.team_id = Some(team_id);
        self
    }

    /// Sets the applicant kind without naming a team.
    #[must_use]
    pub const fn with_applicant_kind(mut self, kind: ApplicantKind) -> Self {
        self.applicant_kind = kind;
        self
    }

    /// Sets the bid in minor currency units.
    #[must_use]
    pub const fn with_bid(mut self, minor_units: i64) -> Self {
        self.bid_amount_cents = Some(minor_units);
        self
    }

    /// Sets the years of experience.
    #[must_use]
    pub const fn with_experience_years(mut self, years: i32) -> Self {
        self.experience_years = Some(years);
        self
    }

    /// Sets the cover message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Outcome of a successful decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    /// The application as decided.
    pub application: Application,
    /// What happened to the notification.
    pub notification: NotificationDelivery,
}

impl DecisionReceipt {
    /// Returns the soft warning to show the hirer when the notification was
    /// deferred.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match &self.notification {
            NotificationDelivery::Delivered => None,
            NotificationDelivery::Deferred { reason } => Some(reason),
        }
    }
}

/// Service-level errors for ledger operations.
#[derive(Debug, Error)]
pub enum ApplicationLedgerError {
    /// Domain validation failed or the application was already decided.
    #[error(transparent)]
    Domain(#[from] ApplicationDomainError),
    /// Application repository operation failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Team ownership check failed.
    #[error(transparent)]
    Team(#[from] TeamServiceError),
    /// A store call exceeded its bound.
    #[error(transparent)]
    Timeout(#[from] DeadlineElapsed),
    /// No application exists with the given identifier.
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// The project does not accept applications now.
    #[error("bidding is closed for project {0}")]
    BiddingClosed(ProjectId),
    /// The project was cancelled.
    #[error("project {0} is cancelled")]
    ProjectCancelled(ProjectId),
    /// The caller is not the project's hirer.
    #[error("user {user_id} is not the hirer of project {project_id}")]
    NotHirer {
        /// Project identifier.
        project_id: ProjectId,
        /// Caller identifier.
        user_id: UserId,
    },
    /// Another decision was recorded first.
    #[error("application {0} was decided concurrently")]
    ConcurrentDecision(ApplicationId),
}

impl ApplicationLedgerError {
    /// Classifies the error on the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ApplicationDomainError::AlreadyDecided { .. })
            | Self::ProjectCancelled(_)
            | Self::ConcurrentDecision(_) => ErrorKind::InvalidState,
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(ApplicationRepositoryError::DuplicateApplication { .. }) => {
                ErrorKind::DuplicateApplication
            }
            Self::Repository(ApplicationRepositoryError::NotFound(_))
            | Self::Projects(ProjectRepositoryError::NotFound(_))
            | Self::ApplicationNotFound(_)
            | Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) | Self::Projects(_) => ErrorKind::TransientStore,
            Self::Team(err) => err.kind(),
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::BiddingClosed(_) => ErrorKind::BiddingClosed,
            Self::NotHirer { .. } => ErrorKind::Authorization,
        }
    }

    /// Returns whether the caller may retry with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Result type for ledger operations.
pub type ApplicationLedgerResult<T> = Result<T, ApplicationLedgerError>;

/// Application ledger orchestration service.
#[derive(Clone)]
pub struct ApplicationLedgerService<A, P, T, Ch, O, C>
where
    A: ApplicationRepository,
    P: ProjectRepository,
    T: TeamRepository,
    Ch: NotificationChannel,
    O: NotificationOutbox,
    C: Clock + Send + Sync,
{
    applications: Arc<A>,
    projects: Arc<P>,
    teams: TeamService<T, C>,
    dispatcher: NotificationDispatcher<Ch, O, C>,
    clock: Arc<C>,
    config: MarketplaceConfig,
}

impl<A, P, T, Ch, O, C> ApplicationLedgerService<A, P, T, Ch, O, C>
where
    A: ApplicationRepository,
    P: ProjectRepository,
    T: TeamRepository,
    Ch: NotificationChannel,
    O: NotificationOutbox,
    C: Clock + Send + Sync,
{
    /// Creates a new ledger service.
    #[must_use]
    pub const fn new(
        applications: Arc<A>,
        projects: Arc<P>,
        teams: TeamService<T, C>,
        dispatcher: NotificationDispatcher<Ch, O, C>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            applications,
            projects,
            teams,
            dispatcher,
            clock,
            config,
        }
    }

    async fn bounded<V, E, F>(&self, operation: &'static str, future: F) -> ApplicationLedgerResult<V>
    where
        F: Future<Output = Result<V, E>>,
        ApplicationLedgerError: From<E>,
    {
        let result = deadline::within(operation, self.config.store_timeout, future).await?;
        Ok(result?)
    }

    async fn find_project_or_error(&self, project_id: ProjectId) -> ApplicationLedgerResult<Project> {
        self.bounded("project.find_by_id", self.projects.find_by_id(project_id))
            .await?
            .ok_or(ApplicationLedgerError::ProjectNotFound(project_id))
    }

    /// Submits an application to a biddable project.
    ///
    /// Uniqueness per (project, applicant) is left to the store insert, so
    /// of two concurrent submissions exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLedgerError::Domain`] for invalid input,
    /// [`ApplicationLedgerError::ProjectNotFound`],
    /// [`ApplicationLedgerError::BiddingClosed`] outside the bidding window,
    /// [`ApplicationLedgerError::Team`] when the applicant does not own the
    /// team, and a duplicate-application repository error.
    pub async fn submit(
        &self,
        request: SubmitApplicationRequest,
    ) -> ApplicationLedgerResult<Application> {
        let applicant =
            Applicant::from_parts(request.applicant_kind, request.applicant_id, request.team_id)?;
        let bid_amount = request
            .bid_amount_cents
            .map(Amount::new)
            .transpose()
            .map_err(|err| ApplicationDomainError::NegativeBid(err.0))?;
        let experience_years = request
            .experience_years
            .map(ExperienceYears::new)
            .transpose()?;

        let project = self.find_project_or_error(request.project_id).await?;
        if !project.is_biddable(self.clock.utc()) {
            return Err(ApplicationLedgerError::BiddingClosed(project.id()));
        }
        if let Some(team_id) = applicant.team_id() {
            self.teams.ensure_owner(team_id, applicant.user_id()).await?;
        }

        let application = Application::submit(
            NewApplication {
                project_id: project.id(),
                applicant,
                bid_amount,
                experience_years,
                message: request.message,
            },
            &*self.clock,
        );
        self.bounded("application.insert", self.applications.insert(&application))
            .await?;
        tracing::info!(
            application_id = %application.id(),
            project_id = %application.project_id(),
            applicant_id = %application.applicant_id(),
            kind = %applicant.kind(),
            "application submitted"
        );
        Ok(application)
    }

    /// Finds an application by identifier.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn find(
        &self,
        application_id: ApplicationId,
    ) -> ApplicationLedgerResult<Option<Application>> {
        self.bounded(
            "application.find_by_id",
            self.applications.find_by_id(application_id),
        )
        .await
    }

    /// Lists a project's applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ApplicationLedgerResult<Vec<Application>> {
        self.bounded(
            "application.list_for_project",
            self.applications.list_for_project(project_id),
        )
        .await
    }

    /// Lists an applicant's applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> ApplicationLedgerResult<Vec<Application>> {
        self.bounded(
            "application.list_for_applicant",
            self.applications.list_for_applicant(applicant_id),
        )
        .await
    }

    /// Records the hirer's decision and announces it to the applicant.
    ///
    /// The status change and its outbox entry commit together. Delivery is
    /// attempted afterwards; its failure is reported in the receipt and
    /// leaves the entry pending for the dispatcher's next drain.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLedgerError::ApplicationNotFound`],
    /// [`ApplicationLedgerError::NotHirer`],
    /// [`ApplicationLedgerError::ProjectCancelled`],
    /// [`ApplicationLedgerError::BiddingClosed`] when accepting outside the
    /// bidding window, and an already-decided error (domain or
    /// [`ApplicationLedgerError::ConcurrentDecision`]) for anything but the
    /// first decision.
    ///
    /// A [`ApplicationLedgerError::Timeout`] does not mean the decision was
    /// skipped: the store call keeps running after the bound elapses and may
    /// still commit, in which case a retry reports the application as
    /// already decided and the outbox drain delivers the notification.
    pub async fn decide(
        &self,
        application_id: ApplicationId,
        decider_id: UserId,
        decision: Decision,
    ) -> ApplicationLedgerResult<DecisionReceipt> {
        let mut application = self
            .find(application_id)
            .await?
            .ok_or(ApplicationLedgerError::ApplicationNotFound(application_id))?;
        let project = self.find_project_or_error(application.project_id()).await?;

        if project.hirer_id() != decider_id {
            return Err(ApplicationLedgerError::NotHirer {
                project_id: project.id(),
                user_id: decider_id,
            });
        }
        if project.status() == ProjectStatus::Cancelled {
            return Err(ApplicationLedgerError::ProjectCancelled(project.id()));
        }
        let now = self.clock.utc();
        application.decide(decision, now)?;
        if decision == Decision::Accept && !project.is_biddable(now) {
            return Err(ApplicationLedgerError::BiddingClosed(project.id()));
        }

        let notification = Notification::for_decision(
            NotificationKey::new(application_id, decision.into()),
            application.applicant_id(),
            project.id(),
            project.title(),
        );
        let outbox_entry = OutboxEntry::pending(notification, &*self.clock);
        let record = DecisionRecord {
            application_id,
            decision,
            decided_at: now,
            outbox_entry: outbox_entry.clone(),
        };
        let outcome = self
            .bounded(
                "application.record_decision",
                self.applications.record_decision(&record),
            )
            .await?;
        if !outcome.is_applied() {
            return Err(ApplicationLedgerError::ConcurrentDecision(application_id));
        }
        tracing::info!(
            %application_id,
            project_id = %project.id(),
            status = %application.status(),
            "application decided"
        );

        let delivery = self.dispatcher.dispatch(&outbox_entry).await;
        if let NotificationDelivery::Deferred { reason } = &delivery {
            tracing::warn!(%application_id, %reason, "decision recorded, notification deferred");
        }
        Ok(DecisionReceipt {
            application,
            notification: delivery,
        })
    }
}
