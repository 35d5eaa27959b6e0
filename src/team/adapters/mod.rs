//! Adapter implementations for team persistence.

pub mod memory;
pub mod postgres;
