//! Domain and service tests for the application ledger.
