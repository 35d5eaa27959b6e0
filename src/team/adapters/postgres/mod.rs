//! `PostgreSQL` adapters for team persistence.

mod models;
mod repository;

pub use repository::PostgresTeamRepository;
