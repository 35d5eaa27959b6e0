//! Project bidding lifecycle.
//!
//! A hirer drafts a project, pays for it through the hosted checkout, and
//! the confirmed payment activates the project and opens a fixed bidding
//! window. Bidding closes implicitly once the window elapses; after that
//! the hirer starts work, completes, or cancels. Every state change is a
//! guarded write, so duplicate payment confirmations and racing hirer
//! actions resolve in the store.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
