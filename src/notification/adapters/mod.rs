//! Adapter implementations for notification delivery.

pub mod memory;
pub mod postgres;
