//! Port contracts for notification delivery.

pub mod channel;
pub mod outbox;

pub use channel::{NotificationChannel, NotificationChannelError, NotificationChannelResult};
pub use outbox::{NotificationOutbox, NotificationOutboxError, NotificationOutboxResult};
