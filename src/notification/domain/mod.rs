//! Domain model for decision notifications and their outbox.

mod error;
mod notification;
mod outbox;

pub use error::NotificationDomainError;
pub use notification::{Notification, NotificationKey, NotificationKind};
pub use outbox::{
    NotificationDelivery, OutboxEntry, OutboxEntryId, OutboxStatus, PersistedOutboxEntryData,
};
