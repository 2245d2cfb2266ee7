//! Core domain logic for the bookkeeper application.
//! This crate is the single source of truth for persistence invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::Category;
pub use model::expense::Expense;
pub use model::record::{
    FieldSpec, Record, RecordDecodeError, RecordShape, Value, ValueKind, ValueReader, PK_FIELD,
    UNSET_PK,
};
pub use repo::sqlite_repo::{
    Filter, RepoError, RepoResult, Repository, SchemaMode, SqliteRepository,
};
pub use service::expense_service::{ExpenseRow, ExpenseService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
