//! Domain model for project applications.

mod application;
mod error;
mod ids;
mod status;

pub use application::{
    Applicant, Application, ExperienceYears, NewApplication, PersistedApplicationData,
};
pub use error::ApplicationDomainError;
pub use ids::ApplicationId;
pub use status::{ApplicantKind, ApplicationStatus, Decision};
