//! Domain model: record-shape machinery and the bookkeeper shapes.
//!
//! # Responsibility
//! - Define the semantic value model and the `Record` persistence contract.
//! - Declare the two concrete shapes used by the application.
//!
//! # Invariants
//! - Every shape carries exactly one integer identity field named `pk`.
//! - `pk == 0` means "not yet persisted"; the repository assigns all other
//!   identity values.

pub mod category;
pub mod expense;
pub mod record;
