//! `PostgreSQL` adapters for notification delivery.

mod channel;
mod models;
mod outbox;

pub use channel::PostgresNotificationChannel;
pub(crate) use models::{NewOutboxRow, new_outbox_row};
pub use outbox::PostgresNotificationOutbox;
