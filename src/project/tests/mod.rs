//! Service and adapter tests for the project lifecycle.
