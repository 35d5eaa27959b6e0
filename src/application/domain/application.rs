//! Application aggregate.

use super::{ApplicantKind, ApplicationDomainError, ApplicationId, ApplicationStatus, Decision};
use crate::project::domain::ProjectId;
use crate::shared::{Amount, UserId};
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Who is applying.
///
/// Team applications are submitted by the team's owner, whose user id is
/// the one counted for uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Applicant {
    /// A coder applying alone.
    Individual {
        /// Applying coder.
        coder_id: UserId,
    },
    /// A team owner applying for their team.
    Team {
        /// Owning coder.
        owner_id: UserId,
        /// Team applied for.
        team_id: TeamId,
    },
}

impl Applicant {
    /// Builds an applicant from its stored columns.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::MissingTeam`] for a team applicant
    /// without a team and [`ApplicationDomainError::UnexpectedTeam`] for an
    /// individual applicant with one.
    pub const fn from_parts(
        kind: ApplicantKind,
        user_id: UserId,
        team_id: Option<TeamId>,
    ) -> Result<Self, ApplicationDomainError> {
        match (kind, team_id) {
            (ApplicantKind::Individual, None) => Ok(Self::Individual { coder_id: user_id }),
            (ApplicantKind::Individual, Some(_)) => Err(ApplicationDomainError::UnexpectedTeam),
            (ApplicantKind::Team, Some(team)) => Ok(Self::Team {
                owner_id: user_id,
                team_id: team,
            }),
            (ApplicantKind::Team, None) => Err(ApplicationDomainError::MissingTeam),
        }
    }

    /// Returns the applying user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::Individual { coder_id } => *coder_id,
            Self::Team { owner_id, .. } => *owner_id,
        }
    }

    /// Returns the applicant kind.
    #[must_use]
    pub const fn kind(&self) -> ApplicantKind {
        match self {
            Self::Individual { .. } => ApplicantKind::Individual,
            Self::Team { .. } => ApplicantKind::Team,
        }
    }

    /// Returns the team, for team applications.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        match self {
            Self::Individual { .. } => None,
            Self::Team { team_id, .. } => Some(*team_id),
        }
    }
}

/// Non-negative years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ExperienceYears(i32);

impl ExperienceYears {
    /// Creates a validated experience figure.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::NegativeExperience`] below zero.
    pub const fn new(years: i32) -> Result<Self, ApplicationDomainError> {
        if years < 0 {
            return Err(ApplicationDomainError::NegativeExperience(years));
        }
        Ok(Self(years))
    }

    /// Returns the number of years.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ExperienceYears {
    type Error = ApplicationDomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExperienceYears> for i32 {
    fn from(value: ExperienceYears) -> Self {
        value.0
    }
}

/// Validated attributes for a new application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    /// Project applied to.
    pub project_id: ProjectId,
    /// Who is applying.
    pub applicant: Applicant,
    /// Optional bid.
    pub bid_amount: Option<Amount>,
    /// Optional experience.
    pub experience_years: Option<ExperienceYears>,
    /// Cover message; blank input takes the default text.
    pub message: String,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted identifier.
    pub id: ApplicationId,
    /// Persisted project.
    pub project_id: ProjectId,
    /// Persisted applicant.
    pub applicant: Applicant,
    /// Persisted bid.
    pub bid_amount: Option<Amount>,
    /// Persisted experience.
    pub experience_years: Option<ExperienceYears>,
    /// Persisted message.
    pub message: String,
    /// Persisted status.
    pub status: ApplicationStatus,
    /// Persisted submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
}

/// A bid on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    project_id: ProjectId,
    applicant: Applicant,
    bid_amount: Option<Amount>,
    experience_years: Option<ExperienceYears>,
    message: String,
    status: ApplicationStatus,
    created_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Text used when an applicant leaves the message blank.
    pub const DEFAULT_MESSAGE: &'static str = "I would like to apply for this project.";

    /// Creates a pending application.
    #[must_use]
    pub fn submit(new_application: NewApplication, clock: &impl Clock) -> Self {
        let trimmed = new_application.message.trim();
        let message = if trimmed.is_empty() {
            Self::DEFAULT_MESSAGE.to_owned()
        } else {
            trimmed.to_owned()
        };
        Self {
            id: ApplicationId::new(),
            project_id: new_application.project_id,
            applicant: new_application.applicant,
            bid_amount: new_application.bid_amount,
            experience_years: new_application.experience_years,
            message,
            status: ApplicationStatus::Pending,
            created_at: clock.utc(),
            decided_at: None,
        }
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedApplicationData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            applicant: data.applicant,
            bid_amount: data.bid_amount,
            experience_years: data.experience_years,
            message: data.message,
            status: data.status,
            created_at: data.created_at,
            decided_at: data.decided_at,
        }
    }

    /// Records the hirer's decision.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::AlreadyDecided`] unless the
    /// application is pending.
    pub fn decide(
        &mut self,
        decision: Decision,
        at: DateTime<Utc>,
    ) -> Result<(), ApplicationDomainError> {
        if !self.status.is_pending() {
            return Err(ApplicationDomainError::AlreadyDecided {
                application_id: self.id,
                status: self.status,
            });
        }
        self.status = decision.resulting_status();
        self.decided_at = Some(at);
        Ok(())
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the project applied to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the applicant.
    #[must_use]
    pub const fn applicant(&self) -> Applicant {
        self.applicant
    }

    /// Returns the applying user.
    #[must_use]
    pub const fn applicant_id(&self) -> UserId {
        self.applicant.user_id()
    }

    /// Returns the bid, if any.
    #[must_use]
    pub const fn bid_amount(&self) -> Option<Amount> {
        self.bid_amount
    }

    /// Returns the experience figure, if any.
    #[must_use]
    pub const fn experience_years(&self) -> Option<ExperienceYears> {
        self.experience_years
    }

    /// Returns the cover message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the review status.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the decision timestamp.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }
}
