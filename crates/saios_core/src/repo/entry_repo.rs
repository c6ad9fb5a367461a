//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `entries` table, one logical collection per domain.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Entry::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Lists are ordered most recent first, ties broken by id descending.

use crate::db::DbError;
use crate::model::domain::Domain;
use crate::model::entry::{from_epoch_ms, Entry, EntryId, EntryValidationError};
use crate::model::project::{ProjectId, ProjectValidationError};
use crate::repo::schema::{bool_to_int, ensure_table_ready, int_to_bool};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    domain,
    recorded_at,
    type,
    value,
    amount,
    category,
    mood,
    completed,
    notes
FROM entries";

const ENTRY_COLUMNS: &[&str] = &[
    "id",
    "domain",
    "recorded_at",
    "type",
    "value",
    "amount",
    "category",
    "mood",
    "completed",
    "notes",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry and project persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    ProjectValidation(ProjectValidationError),
    Db(DbError),
    ProjectNotFound(ProjectId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ProjectValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ProjectNotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::ProjectValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryListQuery {
    pub domain: Option<Domain>,
    /// Exact category label match.
    pub kind: Option<String>,
    /// Inclusive lower bound on `recorded_at`.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `recorded_at`.
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl EntryListQuery {
    /// Lists one whole domain collection.
    pub fn domain(domain: Domain) -> Self {
        Self {
            domain: Some(domain),
            ..Self::default()
        }
    }
}

/// Repository interface for entry CRUD operations.
pub trait EntryRepository {
    fn insert_entry(&self, entry: &Entry) -> RepoResult<EntryId>;
    /// Replaces stored fields of an existing entry. Returns `false` when absent.
    fn update_entry(&self, entry: &Entry) -> RepoResult<bool>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
    /// Hard-deletes one entry. Returns `false` when absent.
    fn delete_entry(&self, id: EntryId) -> RepoResult<bool>;
    /// Removes every entry of one domain, returning the removed row count.
    fn clear_domain(&self, domain: Domain) -> RepoResult<usize>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a migrated connection, rejecting anything else.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "entries", ENTRY_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(&self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                id,
                domain,
                recorded_at,
                type,
                value,
                amount,
                category,
                mood,
                completed,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                entry.id.to_string(),
                entry.domain.key(),
                entry.recorded_at.timestamp_millis(),
                entry.kind.as_str(),
                entry.value.as_deref(),
                entry.amount,
                entry.category.as_deref(),
                entry.mood.as_deref(),
                entry.completed.map(bool_to_int),
                entry.notes.as_deref(),
            ],
        )?;

        Ok(entry.id)
    }

    fn update_entry(&self, entry: &Entry) -> RepoResult<bool> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                domain = ?1,
                recorded_at = ?2,
                type = ?3,
                value = ?4,
                amount = ?5,
                category = ?6,
                mood = ?7,
                completed = ?8,
                notes = ?9
             WHERE id = ?10;",
            params![
                entry.domain.key(),
                entry.recorded_at.timestamp_millis(),
                entry.kind.as_str(),
                entry.value.as_deref(),
                entry.amount,
                entry.category.as_deref(),
                entry.mood.as_deref(),
                entry.completed.map(bool_to_int),
                entry.notes.as_deref(),
                entry.id.to_string(),
            ],
        )?;

        Ok(changed > 0)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(domain) = query.domain {
            sql.push_str(" AND domain = ?");
            bind_values.push(Value::Text(domain.key().to_string()));
        }

        if let Some(kind) = &query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.clone()));
        }

        if let Some(since) = query.since {
            sql.push_str(" AND recorded_at >= ?");
            bind_values.push(Value::Integer(since.timestamp_millis()));
        }

        if let Some(until) = query.until {
            sql.push_str(" AND recorded_at <= ?");
            bind_values.push(Value::Integer(until.timestamp_millis()));
        }

        sql.push_str(" ORDER BY recorded_at DESC, id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn clear_domain(&self, domain: Domain) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE domain = ?1;", [domain.key()])?;
        Ok(changed)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in entries.id"))
    })?;

    let domain_text: String = row.get("domain")?;
    let domain = Domain::parse(&domain_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid domain `{domain_text}` in entries.domain"
        ))
    })?;

    let recorded_ms: i64 = row.get("recorded_at")?;
    let recorded_at = from_epoch_ms(recorded_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{recorded_ms}` in entries.recorded_at"
        ))
    })?;

    let completed = match row.get::<_, Option<i64>>("completed")? {
        Some(value) => Some(int_to_bool(value, "entries.completed")?),
        None => None,
    };

    let entry = Entry {
        id,
        domain,
        recorded_at,
        kind: row.get("type")?,
        value: row.get("value")?,
        amount: row.get("amount")?,
        category: row.get("category")?,
        mood: row.get("mood")?,
        completed,
        notes: row.get("notes")?,
    };
    entry.validate()?;
    Ok(entry)
}
