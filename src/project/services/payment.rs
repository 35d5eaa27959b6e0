//! Hosted-checkout redirect parameters.
//!
//! The checkout page redirects back with `status` and `projectId` query
//! parameters. Nothing here authenticates the redirect; see the payment
//! notes in `DESIGN.md`.

use crate::project::domain::{Project, ProjectId};

/// Result reported by the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStatus {
    /// Payment completed.
    Success,
    /// The hirer abandoned checkout.
    Cancel,
}

impl CheckoutStatus {
    pub(super) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" => Some(Self::Success),
            "cancel" | "cancelled" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Raw redirect parameters, validated by
/// [`super::ProjectLifecycleService::handle_payment_return`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentReturn {
    /// Raw `status` parameter.
    pub status: Option<String>,
    /// Raw `projectId` parameter.
    pub project_id: Option<String>,
}

impl PaymentReturn {
    /// Creates redirect parameters from already-extracted values.
    #[must_use]
    pub fn new(status: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            project_id: Some(project_id.into()),
        }
    }

    /// Extracts `status` and `projectId` from a query string such as
    /// `status=success&projectId=...`. A leading `?` is ignored, as are
    /// unrelated parameters.
    ///
    /// Values are taken verbatim: callers holding a percent-encoded query
    /// must decode it first (HTTP frameworks hand over decoded parameters),
    /// or build the redirect with [`PaymentReturn::new`]. An encoded value
    /// such as `%20success` is kept as-is and later rejected as malformed.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut parsed = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "status" => parsed.status = Some(value.to_owned()),
                "projectId" | "project_id" => parsed.project_id = Some(value.to_owned()),
                _ => {}
            }
        }
        parsed
    }
}

/// What a handled redirect did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment confirmed; carries the project as stored afterwards.
    Confirmed(Project),
    /// Checkout was abandoned; the project was not touched.
    Cancelled(ProjectId),
}
