//! Team registry for the marketplace.
//!
//! Teams are persisted entities with exactly one owning coder. The ledger
//! consults the registry to authorise applications made on a team's
//! behalf. The module follows the same hexagonal split as the other
//! bounded contexts:
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
