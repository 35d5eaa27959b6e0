//! In-memory notification adapters.

mod channel;
mod outbox;

pub use channel::InMemoryNotificationChannel;
pub use outbox::InMemoryNotificationOutbox;
