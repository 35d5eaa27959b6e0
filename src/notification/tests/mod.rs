//! Domain and dispatcher tests for decision notifications.
