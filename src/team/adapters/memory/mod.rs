//! In-memory adapters for the team registry.

mod team;

pub use team::InMemoryTeamRepository;
