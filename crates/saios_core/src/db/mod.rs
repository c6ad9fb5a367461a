//! Tracker store on SQLite.
//!
//! The store is one database file holding every domain collection plus the
//! project and task tables. `open` hands out connections, `migrations` owns
//! the schema history.
//!
//! # Invariants
//! - A connection is only handed out once its schema matches
//!   `migrations::target_version()`.
//! - A store written by a newer build is never downgraded or touched.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The directory holding the store file could not be created.
    StoreDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The store carries schema changes this build does not know about.
    StoreTooNew {
        store_version: u32,
        supported_version: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "tracker store error: {err}"),
            Self::StoreDirectory { path, source } => write!(
                f,
                "cannot create tracker store directory `{}`: {source}",
                path.display()
            ),
            Self::StoreTooNew {
                store_version,
                supported_version,
            } => write!(
                f,
                "tracker store uses schema v{store_version}; this build supports up to v{supported_version}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::StoreDirectory { source, .. } => Some(source),
            Self::StoreTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
