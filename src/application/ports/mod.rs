//! Port contracts for the application ledger.

pub mod repository;

pub use repository::{
    ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult,
    DecisionRecord,
};
