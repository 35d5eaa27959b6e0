//! In-memory adapters for project lifecycle tests.

mod project;

pub use project::InMemoryProjectRepository;
