//! Service layer for project drafting, payment activation, and hirer-driven
//! transitions.

use super::payment::{CheckoutStatus, PaymentOutcome, PaymentReturn};
use crate::application::{
    domain::ApplicationStatus,
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use crate::config::MarketplaceConfig;
use crate::deadline::{self, DeadlineElapsed};
use crate::error::ErrorKind;
use crate::project::{
    domain::{
        Activation, ActivationOutcome, HirePreference, NewProject, Project, ProjectDomainError,
        ProjectId, ProjectStatus, ProjectTitle, SkillId,
    },
    ports::{ProjectRepository, ProjectRepositoryError, StatusTransition},
};
use crate::shared::{Amount, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Request payload for creating a draft project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDraftRequest {
    hirer_id: UserId,
    title: String,
    description: String,
    required_skills: Vec<SkillId>,
    hire_preference: HirePreference,
    budget_cents: Option<i64>,
    timeline: Option<NaiveDate>,
}

impl CreateDraftRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        hirer_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            hirer_id,
            title: title.into(),
            description: description.into(),
            required_skills: Vec::new(),
            hire_preference: HirePreference::default(),
            budget_cents: None,
            timeline: None,
        }
    }

    /// Sets the required skills. Duplicates collapse.
    #[must_use]
    pub fn with_required_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.required_skills = skills.into_iter().collect();
        self
    }

    /// Sets the hire preference.
    #[must_use]
    pub const fn with_hire_preference(mut self, preference: HirePreference) -> Self {
        self.hire_preference = preference;
        self
    }

    /// Sets the budget in minor currency units.
    #[must_use]
    pub const fn with_budget(mut self, minor_units: i64) -> Self {
        self.budget_cents = Some(minor_units);
        self
    }

    /// Sets the delivery deadline.
    #[must_use]
    pub const fn with_timeline(mut self, timeline: NaiveDate) -> Self {
        self.timeline = Some(timeline);
        self
    }
}

/// Service-level errors for project lifecycle operations.
#[derive(Debug, Error)]
pub enum ProjectLifecycleError {
    /// Domain validation or state-machine check failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Application lookup failed.
    #[error(transparent)]
    Applications(#[from] ApplicationRepositoryError),
    /// A store call exceeded its bound.
    #[error(transparent)]
    Timeout(#[from] DeadlineElapsed),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    NotFound(ProjectId),
    /// The caller is not the project's hirer.
    #[error("user {user_id} is not the hirer of project {project_id}")]
    NotHirer {
        /// Project identifier.
        project_id: ProjectId,
        /// Caller identifier.
        user_id: UserId,
    },
    /// Work cannot start before an application was accepted.
    #[error("project {0} has no accepted application")]
    NoAcceptedApplication(ProjectId),
    /// The stored status changed between read and write.
    #[error("project {0} was modified concurrently")]
    ConcurrentUpdate(ProjectId),
    /// The checkout redirect could not be interpreted.
    #[error("invalid payment return: {0}")]
    InvalidPaymentReturn(String),
}

impl ProjectLifecycleError {
    /// Classifies the error on the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ProjectDomainError::InvalidLifecycleTransition { .. })
            | Self::Repository(ProjectRepositoryError::DuplicateProject(_))
            | Self::NoAcceptedApplication(_)
            | Self::ConcurrentUpdate(_) => ErrorKind::InvalidState,
            Self::Domain(_) | Self::InvalidPaymentReturn(_) => ErrorKind::Validation,
            Self::Repository(ProjectRepositoryError::NotFound(_))
            | Self::Applications(ApplicationRepositoryError::NotFound(_))
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) | Self::Applications(_) => ErrorKind::TransientStore,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::NotHirer { .. } => ErrorKind::Authorization,
        }
    }

    /// Returns whether the caller may retry with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Result type for project lifecycle operations.
pub type ProjectLifecycleResult<T> = Result<T, ProjectLifecycleError>;

/// Project lifecycle orchestration service.
///
/// Holds only shared handles; every cross-request guarantee comes from the
/// repository's guarded writes.
#[derive(Clone)]
pub struct ProjectLifecycleService<P, A, C>
where
    P: ProjectRepository,
    A: ApplicationRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    applications: Arc<A>,
    clock: Arc<C>,
    config: MarketplaceConfig,
}

impl<P, A, C> ProjectLifecycleService<P, A, C>
where
    P: ProjectRepository,
    A: ApplicationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        applications: Arc<A>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            projects,
            applications,
            clock,
            config,
        }
    }

    async fn bounded<T, E, F>(&self, operation: &'static str, future: F) -> ProjectLifecycleResult<T>
    where
        F: Future<Output = Result<T, E>>,
        ProjectLifecycleError: From<E>,
    {
        let result = deadline::within(operation, self.config.store_timeout, future).await?;
        Ok(result?)
    }

    async fn find_project_or_error(&self, project_id: ProjectId) -> ProjectLifecycleResult<Project> {
        self.find(project_id)
            .await?
            .ok_or(ProjectLifecycleError::NotFound(project_id))
    }

    /// Creates an unpaid draft project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Domain`] when the title or
    /// description is blank or the budget is negative, and repository
    /// errors when persistence fails.
    pub async fn create_draft(&self, request: CreateDraftRequest) -> ProjectLifecycleResult<Project> {
        let title = ProjectTitle::new(request.title)?;
        let description = request.description.trim();
        if description.is_empty() {
            return Err(ProjectDomainError::EmptyDescription.into());
        }
        let budget = request
            .budget_cents
            .map(Amount::new)
            .transpose()
            .map_err(|err| ProjectDomainError::NegativeBudget(err.0))?;

        let project = Project::new_draft(
            NewProject {
                hirer_id: request.hirer_id,
                title,
                description: description.to_owned(),
                budget,
                timeline: request.timeline,
                required_skills: request.required_skills.into_iter().collect(),
                hire_preference: request.hire_preference,
            },
            &*self.clock,
        );
        self.bounded("project.store", self.projects.store(&project))
            .await?;
        tracing::info!(
            project_id = %project.id(),
            hirer_id = %project.hirer_id(),
            "draft project created"
        );
        Ok(project)
    }

    /// Confirms payment for a project, activating it and opening its
    /// bidding window.
    ///
    /// Safe under at-least-once delivery: a project that is already active
    /// or further along is returned unchanged, and its bidding deadline is
    /// never moved.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] for an unknown project
    /// and [`ProjectLifecycleError::Domain`] for a cancelled one.
    pub async fn confirm_payment(&self, project_id: ProjectId) -> ProjectLifecycleResult<Project> {
        let mut project = self.find_project_or_error(project_id).await?;
        let activation = Activation::starting_at(self.clock.utc(), self.config.bidding_window);

        if project.activate(&activation)? == ActivationOutcome::AlreadyActive {
            tracing::debug!(%project_id, status = %project.status(), "payment already confirmed");
            return Ok(project);
        }

        let outcome = self
            .bounded(
                "project.activate",
                self.projects.activate(project_id, &activation),
            )
            .await?;
        if outcome.is_applied() {
            tracing::info!(
                %project_id,
                bidding_end_time = %activation.window().ends_at(),
                "project activated"
            );
            return Ok(project);
        }

        // Another writer moved the project first; report what it left.
        let mut current = self.find_project_or_error(project_id).await?;
        current.activate(&activation)?;
        tracing::debug!(%project_id, status = %current.status(), "concurrent payment confirmation");
        Ok(current)
    }

    /// Interprets a checkout redirect.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::InvalidPaymentReturn`] for a missing
    /// or malformed `status` or `projectId`, and any error of
    /// [`Self::confirm_payment`] on the success path.
    pub async fn handle_payment_return(
        &self,
        payment_return: PaymentReturn,
    ) -> ProjectLifecycleResult<PaymentOutcome> {
        let raw_id = payment_return
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ProjectLifecycleError::InvalidPaymentReturn("missing projectId".to_owned())
            })?;
        let project_id = Uuid::parse_str(raw_id)
            .map(ProjectId::from_uuid)
            .map_err(|_| {
                ProjectLifecycleError::InvalidPaymentReturn(format!(
                    "malformed projectId '{raw_id}'"
                ))
            })?;
        let raw_status = payment_return.status.as_deref().unwrap_or_default();
        let status = CheckoutStatus::parse(raw_status).ok_or_else(|| {
            ProjectLifecycleError::InvalidPaymentReturn(format!("unknown status '{raw_status}'"))
        })?;

        match status {
            CheckoutStatus::Success => Ok(PaymentOutcome::Confirmed(
                self.confirm_payment(project_id).await?,
            )),
            CheckoutStatus::Cancel => {
                tracing::info!(%project_id, "checkout cancelled");
                Ok(PaymentOutcome::Cancelled(project_id))
            }
        }
    }

    /// Cancels a project on behalf of its hirer.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotHirer`] for other callers,
    /// [`ProjectLifecycleError::Domain`] for terminal projects, and
    /// [`ProjectLifecycleError::ConcurrentUpdate`] when the status changed
    /// underneath.
    pub async fn cancel(
        &self,
        project_id: ProjectId,
        hirer_id: UserId,
    ) -> ProjectLifecycleResult<Project> {
        let project = self.find_project_or_error(project_id).await?;
        self.apply_hirer_transition(project, hirer_id, ProjectStatus::Cancelled)
            .await
    }

    /// Starts work on a project that has an accepted application.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NoAcceptedApplication`] when nobody
    /// was hired yet, plus the errors of [`Self::cancel`].
    pub async fn start_work(
        &self,
        project_id: ProjectId,
        hirer_id: UserId,
    ) -> ProjectLifecycleResult<Project> {
        let project = self.find_project_or_error(project_id).await?;
        ensure_hirer(&project, hirer_id)?;
        let applications = self
            .bounded(
                "application.list_for_project",
                self.applications.list_for_project(project_id),
            )
            .await?;
        if !applications
            .iter()
            .any(|application| application.status() == ApplicationStatus::Accepted)
        {
            return Err(ProjectLifecycleError::NoAcceptedApplication(project_id));
        }
        self.apply_hirer_transition(project, hirer_id, ProjectStatus::InProgress)
            .await
    }

    /// Marks an in-progress project completed.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::cancel`].
    pub async fn complete(
        &self,
        project_id: ProjectId,
        hirer_id: UserId,
    ) -> ProjectLifecycleResult<Project> {
        let project = self.find_project_or_error(project_id).await?;
        self.apply_hirer_transition(project, hirer_id, ProjectStatus::Completed)
            .await
    }

    async fn apply_hirer_transition(
        &self,
        project: Project,
        hirer_id: UserId,
        target: ProjectStatus,
    ) -> ProjectLifecycleResult<Project> {
        ensure_hirer(&project, hirer_id)?;
        let now = self.clock.utc();
        project.ensure_can_transition(target, now)?;

        let project_id = project.id();
        let transition = StatusTransition {
            expected: project.status(),
            target,
            at: now,
        };
        let outcome = self
            .bounded(
                "project.transition_status",
                self.projects.transition_status(project_id, transition),
            )
            .await?;
        if !outcome.is_applied() {
            return Err(ProjectLifecycleError::ConcurrentUpdate(project_id));
        }

        tracing::info!(
            %project_id,
            from = %transition.expected,
            to = %target,
            "project status changed"
        );
        let mut data = project.to_persisted();
        data.status = target;
        data.updated_at = now;
        Ok(Project::from_persisted(data))
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn find(&self, project_id: ProjectId) -> ProjectLifecycleResult<Option<Project>> {
        self.bounded("project.find_by_id", self.projects.find_by_id(project_id))
            .await
    }

    /// Lists projects accepting bids at `now`, newest first.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn list_biddable(&self, now: DateTime<Utc>) -> ProjectLifecycleResult<Vec<Project>> {
        self.bounded(
            "project.list_accepting_bids",
            self.projects.list_accepting_bids(now),
        )
        .await
    }

    /// Lists a hirer's projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns persistence and timeout errors.
    pub async fn list_for_hirer(&self, hirer_id: UserId) -> ProjectLifecycleResult<Vec<Project>> {
        self.bounded("project.list_by_hirer", self.projects.list_by_hirer(hirer_id))
            .await
    }
}

fn ensure_hirer(project: &Project, user_id: UserId) -> ProjectLifecycleResult<()> {
    if project.hirer_id() == user_id {
        return Ok(());
    }
    Err(ProjectLifecycleError::NotHirer {
        project_id: project.id(),
        user_id,
    })
}
