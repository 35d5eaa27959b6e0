//! Value types shared by every marketplace bounded context.
//!
//! Users are owned by the external authentication provider; the marketplace
//! only refers to them by identifier. Monetary amounts appear on both
//! project budgets and application bids, and every context performs
//! guarded writes whose outcome is reported as a [`WriteOutcome`].

mod amount;
mod user;
mod write;

pub use amount::{Amount, NegativeAmountError};
pub use user::UserId;
pub use write::WriteOutcome;
