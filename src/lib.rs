//! Bidboard: a freelance project marketplace core.
//!
//! Hirers post projects, pay a posting fee to open a bidding window, and
//! decide on bids submitted by individual coders or team owners. Each
//! decision is recorded together with a notification in a transactional
//! outbox, so the applicant is told about it even when the notification
//! channel is briefly unavailable.
//!
//! # Architecture
//!
//! Every bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and delivery
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Use-case orchestration over the ports
//!
//! # Modules
//!
//! - [`project`]: Project drafts, paid activation and bidding windows
//! - [`application`]: Bid submission and hirer decisions
//! - [`team`]: Team registry used for team bids
//! - [`notification`]: Decision notifications and the outbox dispatcher
//! - [`shared`]: Identifiers and value types used across contexts

pub mod application;
pub mod config;
pub mod deadline;
pub mod error;
pub mod notification;
pub mod project;
pub mod shared;
pub mod storage;
pub mod team;
pub mod telemetry;
