//! `PostgreSQL` adapters for application persistence.

mod models;
mod repository;

pub use repository::PostgresApplicationRepository;
