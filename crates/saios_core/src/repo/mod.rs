//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repositories refuse connections that are not fully migrated.
//! - Absent ids are reported as `false`/`None`, never as errors.

pub mod entry_repo;
pub mod project_repo;
mod schema;
