//! Domain model for the project bidding lifecycle.
//!
//! A project starts as an unpaid draft, opens a time-boxed bidding window
//! when payment is confirmed, and moves through hiring to a terminal state.
//! The window closes implicitly: [`Project::effective_status`] reports
//! `closed` once the window has elapsed, whatever the stored status says.

mod bidding;
mod error;
mod ids;
mod project;
mod status;

pub use bidding::{Activation, BiddingWindow};
pub use error::{ParseHirePreferenceError, ParseProjectStatusError, ProjectDomainError};
pub use ids::{ProjectId, SkillId};
pub use project::{
    ActivationOutcome, HirePreference, NewProject, PersistedProjectData, Project, ProjectTitle,
};
pub use status::ProjectStatus;
