//! Adapter implementations for application persistence.

pub mod memory;
pub mod postgres;
