//! Step definitions for paid bidding lifecycle scenarios.

pub mod world;

mod given;
mod then;
mod when;
