//! Unit and service tests for the team registry.
