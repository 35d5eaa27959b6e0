//! In-memory adapters for the application ledger.

mod application;

pub use application::InMemoryApplicationRepository;
