//! Project aggregate root.

use super::{
    Activation, BiddingWindow, ParseHirePreferenceError, ProjectDomainError, ProjectId,
    ProjectStatus, SkillId,
};
use crate::shared::{Amount, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Whether the hirer wants individuals, teams, or either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HirePreference {
    /// Only individual coders.
    Individual,
    /// Only teams.
    Team,
    /// No preference.
    #[default]
    Either,
}

impl HirePreference {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Team => "team",
            Self::Either => "either",
        }
    }
}

impl fmt::Display for HirePreference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HirePreference {
    type Error = ParseHirePreferenceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "team" => Ok(Self::Team),
            "either" => Ok(Self::Either),
            _ => Err(ParseHirePreferenceError(value.to_owned())),
        }
    }
}

/// Validated project title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTitle(String);

impl ProjectTitle {
    /// Maximum title length in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Creates a trimmed, non-empty title.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyTitle`] for blank input and
    /// [`ProjectDomainError::TitleTooLong`] past [`Self::MAX_LENGTH`].
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ProjectDomainError::TitleTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated attributes for a new draft project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Owning hirer.
    pub hirer_id: UserId,
    /// Validated title.
    pub title: ProjectTitle,
    /// Non-empty description.
    pub description: String,
    /// Optional budget.
    pub budget: Option<Amount>,
    /// Optional delivery deadline.
    pub timeline: Option<NaiveDate>,
    /// Required skills.
    pub required_skills: BTreeSet<SkillId>,
    /// Hire preference.
    pub hire_preference: HirePreference,
}

/// Result of applying a payment activation to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The project moved to `active` and its window opened.
    Activated,
    /// The project was already active or further along; nothing changed.
    AlreadyActive,
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    hirer_id: UserId,
    title: ProjectTitle,
    description: String,
    budget: Option<Amount>,
    timeline: Option<NaiveDate>,
    required_skills: BTreeSet<SkillId>,
    hire_preference: HirePreference,
    status: ProjectStatus,
    paid: bool,
    bidding_end_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Persisted owning hirer.
    pub hirer_id: UserId,
    /// Persisted title.
    pub title: ProjectTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted budget.
    pub budget: Option<Amount>,
    /// Persisted deadline.
    pub timeline: Option<NaiveDate>,
    /// Persisted required skills.
    pub required_skills: BTreeSet<SkillId>,
    /// Persisted hire preference.
    pub hire_preference: HirePreference,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Persisted payment flag.
    pub paid: bool,
    /// Persisted bidding deadline.
    pub bidding_end_time: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates an unpaid draft project.
    #[must_use]
    pub fn new_draft(new_project: NewProject, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            hirer_id: new_project.hirer_id,
            title: new_project.title,
            description: new_project.description,
            budget: new_project.budget,
            timeline: new_project.timeline,
            required_skills: new_project.required_skills,
            hire_preference: new_project.hire_preference,
            status: ProjectStatus::Draft,
            paid: false,
            bidding_end_time: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            hirer_id: data.hirer_id,
            title: data.title,
            description: data.description,
            budget: data.budget,
            timeline: data.timeline,
            required_skills: data.required_skills,
            hire_preference: data.hire_preference,
            status: data.status,
            paid: data.paid,
            bidding_end_time: data.bidding_end_time,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Copies the aggregate into its persistence parameter object.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedProjectData {
        PersistedProjectData {
            id: self.id,
            hirer_id: self.hirer_id,
            title: self.title.clone(),
            description: self.description.clone(),
            budget: self.budget,
            timeline: self.timeline,
            required_skills: self.required_skills.clone(),
            hire_preference: self.hire_preference,
            status: self.status,
            paid: self.paid,
            bidding_end_time: self.bidding_end_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning hirer.
    #[must_use]
    pub const fn hirer_id(&self) -> UserId {
        self.hirer_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ProjectTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the budget, if any.
    #[must_use]
    pub const fn budget(&self) -> Option<Amount> {
        self.budget
    }

    /// Returns the delivery deadline, if any.
    #[must_use]
    pub const fn timeline(&self) -> Option<NaiveDate> {
        self.timeline
    }

    /// Returns the required skills.
    #[must_use]
    pub const fn required_skills(&self) -> &BTreeSet<SkillId> {
        &self.required_skills
    }

    /// Returns the hire preference.
    #[must_use]
    pub const fn hire_preference(&self) -> HirePreference {
        self.hire_preference
    }

    /// Returns the stored lifecycle status.
    ///
    /// Use [`Self::effective_status`] when a decision depends on whether
    /// bidding is still open.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns whether payment was confirmed.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.paid
    }

    /// Returns the bidding deadline, set once on first activation.
    #[must_use]
    pub const fn bidding_end_time(&self) -> Option<DateTime<Utc>> {
        self.bidding_end_time
    }

    /// Returns the bidding window, if the project was ever activated.
    #[must_use]
    pub fn bidding_window(&self) -> Option<BiddingWindow> {
        self.bidding_end_time.map(BiddingWindow::closing_at)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the status as observed at `now`: an `active` project whose
    /// window has elapsed reads as `closed`.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> ProjectStatus {
        let window_elapsed = self
            .bidding_window()
            .is_some_and(|window| !window.is_open(now));
        if self.status == ProjectStatus::Active && window_elapsed {
            return ProjectStatus::Closed;
        }
        self.status
    }

    /// Returns whether new applications are admitted at `now`.
    #[must_use]
    pub fn is_biddable(&self, now: DateTime<Utc>) -> bool {
        self.status.accepts_bids()
            && self
                .bidding_window()
                .is_none_or(|window| window.is_open(now))
    }

    /// Applies a payment activation.
    ///
    /// Activating a project that is already active or further along leaves
    /// it untouched, including its bidding deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidLifecycleTransition`] for a
    /// cancelled project.
    pub fn activate(
        &mut self,
        activation: &Activation,
    ) -> Result<ActivationOutcome, ProjectDomainError> {
        if self.status == ProjectStatus::Cancelled {
            return Err(self.transition_error(ProjectStatus::Active));
        }
        if !self.status.can_activate() {
            return Ok(ActivationOutcome::AlreadyActive);
        }

        self.status = ProjectStatus::Active;
        self.paid = true;
        if self.bidding_end_time.is_none() {
            self.bidding_end_time = Some(activation.window().ends_at());
        }
        self.updated_at = activation.activated_at();
        Ok(ActivationOutcome::Activated)
    }

    /// Moves the project to `target`, judged against the status observed
    /// at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidLifecycleTransition`] when the
    /// state machine forbids the move.
    pub fn transition_to(
        &mut self,
        target: ProjectStatus,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        let now = clock.utc();
        self.ensure_can_transition(target, now)?;
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Validates a transition without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidLifecycleTransition`] when the
    /// state machine forbids the move.
    pub fn ensure_can_transition(
        &self,
        target: ProjectStatus,
        now: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        if self.effective_status(now).can_transition_to(target) {
            return Ok(());
        }
        Err(self.transition_error_at(target, now))
    }

    fn transition_error(&self, target: ProjectStatus) -> ProjectDomainError {
        ProjectDomainError::InvalidLifecycleTransition {
            project_id: self.id,
            from: self.status,
            to: target,
        }
    }

    fn transition_error_at(&self, target: ProjectStatus, now: DateTime<Utc>) -> ProjectDomainError {
        ProjectDomainError::InvalidLifecycleTransition {
            project_id: self.id,
            from: self.effective_status(now),
            to: target,
        }
    }
}
