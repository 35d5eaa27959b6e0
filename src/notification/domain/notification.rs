//! Notification payloads and their idempotency key.

use super::NotificationDomainError;
use crate::application::domain::{ApplicationId, Decision};
use crate::project::domain::{ProjectId, ProjectTitle};
use crate::shared::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What happened to the recipient's application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The application was accepted.
    Accepted,
    /// The application was rejected.
    Rejected,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Accepted => "Application Accepted",
            Self::Rejected => "Application Rejected",
        }
    }
}

impl From<Decision> for NotificationKind {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accept => Self::Accepted,
            Decision::Reject => Self::Rejected,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = NotificationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(NotificationDomainError::UnknownKind(value.to_owned())),
        }
    }
}

/// Idempotency key for a decision notification.
///
/// A given application produces at most one notification per decision
/// kind, so the pair identifies the notification across retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationKey {
    application_id: ApplicationId,
    kind: NotificationKind,
}

impl NotificationKey {
    /// Creates a key for `application_id` and `kind`.
    #[must_use]
    pub const fn new(application_id: ApplicationId, kind: NotificationKind) -> Self {
        Self {
            application_id,
            kind,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the decision kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Renders the key as stored in `dedupe_key` columns.
    #[must_use]
    pub fn dedupe_key(&self) -> String {
        format!("{}:{}", self.application_id, self.kind)
    }

    /// Parses a stored `dedupe_key`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDomainError::MalformedKey`] when the value is
    /// not `<uuid>:<kind>`.
    pub fn parse(value: &str) -> Result<Self, NotificationDomainError> {
        let malformed = || NotificationDomainError::MalformedKey(value.to_owned());
        let (raw_id, raw_kind) = value.split_once(':').ok_or_else(malformed)?;
        let application_id = Uuid::parse_str(raw_id).map_err(|_| malformed())?;
        let kind = NotificationKind::try_from(raw_kind).map_err(|_| malformed())?;
        Ok(Self::new(ApplicationId::from_uuid(application_id), kind))
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.application_id, self.kind)
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    key: NotificationKey,
    recipient_id: UserId,
    title: String,
    message: String,
    related_id: ProjectId,
}

impl Notification {
    /// Builds the notification sent to an applicant when their application
    /// for `project_title` is decided.
    #[must_use]
    pub fn for_decision(
        key: NotificationKey,
        recipient_id: UserId,
        project_id: ProjectId,
        project_title: &ProjectTitle,
    ) -> Self {
        let kind = key.kind();
        Self {
            key,
            recipient_id,
            title: kind.title().to_owned(),
            message: format!(
                "Your application for project \"{project_title}\" has been {kind}."
            ),
            related_id: project_id,
        }
    }

    /// Reconstructs a notification from stored columns.
    #[must_use]
    pub const fn from_parts(
        key: NotificationKey,
        recipient_id: UserId,
        title: String,
        message: String,
        related_id: ProjectId,
    ) -> Self {
        Self {
            key,
            recipient_id,
            title,
            message,
            related_id,
        }
    }

    /// Returns the idempotency key.
    #[must_use]
    pub const fn key(&self) -> NotificationKey {
        self.key
    }

    /// Returns the notification kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.key.kind()
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the related project.
    #[must_use]
    pub const fn related_id(&self) -> ProjectId {
        self.related_id
    }
}
