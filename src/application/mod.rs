//! Application ledger for project bids.
//!
//! Coders, individually or on behalf of a team they own, submit one
//! application per project while the project is biddable. The project's
//! hirer then accepts or rejects each application exactly once. A decision
//! and the outbox entry announcing it are written atomically; delivery is
//! handed to the notification dispatcher afterwards and can only ever
//! produce a soft warning.
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
