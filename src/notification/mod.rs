//! Notification dispatch for application decisions.
//!
//! A decision writes an [`domain::OutboxEntry`] in the same atomic store
//! operation as the status change. The dispatcher then hands the entry to a
//! [`ports::NotificationChannel`]; a delivery failure leaves the entry
//! pending for a later drain pass and never touches the decision itself.
//! Channels are idempotent on [`domain::NotificationKey`], so delivering
//! the same entry twice is harmless.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
