//! Core logic for the SaiOS personal tracker.
//! This crate is the single source of truth for entry storage, rolling
//! aggregation and backup semantics; front-ends only render its output.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;
pub mod transfer;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::domain::Domain;
pub use model::entry::{Entry, EntryId, EntryPatch, EntryValidationError, NewEntry};
pub use model::project::{Project, ProjectId, ProjectStatus, Task, TaskId};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use service::entry_service::EntryService;
pub use service::project_service::{ProjectOverview, ProjectService};
pub use stats::window::{DayWindow, Reducer};
pub use transfer::{export_bundle, import_bundle, ImportSummary, TransferError};

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
