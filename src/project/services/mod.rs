//! Application services for the project bidding lifecycle.

mod lifecycle;
mod payment;

pub use lifecycle::{
    CreateDraftRequest, ProjectLifecycleError, ProjectLifecycleResult, ProjectLifecycleService,
};
pub use payment::{CheckoutStatus, PaymentOutcome, PaymentReturn};
