//! Use-case services on top of the repository layer.
//!
//! # Responsibility
//! - Provide stable entry points for the enclosing application (GUI/CLI).
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Services never bypass repository preconditions.
//! - The service layer stays storage-agnostic.

pub mod expense_service;
