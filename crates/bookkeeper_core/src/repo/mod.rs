//! Repository layer: generic record/row mapping over SQLite.
//!
//! # Responsibility
//! - Derive table schemas from statically declared record shapes.
//! - Keep SQL query details inside the persistence boundary.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidState`, `NotFound`,
//!   `InvalidArgument`) in addition to DB transport errors.
//! - Each operation uses the connection for that single operation only;
//!   no cross-operation transactions.

pub mod sqlite_repo;
