//! Command implementations, one module per page of the tracker.

pub mod chart;
pub mod config;
pub mod entry;
pub mod project;
pub mod stats;
pub mod streak;
pub mod transfer;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rusqlite::Connection;
use saios_core::transfer::bundle::parse_record_date;
use saios_core::{
    AppConfig, Domain, Entry, EntryService, ProjectService, RepoResult, SqliteEntryRepository,
    SqliteProjectRepository,
};
use serde::Serialize;
use std::error::Error;
use uuid::Uuid;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Per-run state shared by every store command.
pub struct Context {
    pub config: AppConfig,
    pub conn: Connection,
    now: DateTime<Utc>,
}

impl Context {
    pub fn new(config: AppConfig, conn: Connection) -> Self {
        Self {
            config,
            conn,
            now: Utc::now(),
        }
    }

    pub fn entries(&self) -> RepoResult<EntryService<SqliteEntryRepository<'_>>> {
        Ok(EntryService::new(SqliteEntryRepository::try_new(&self.conn)?))
    }

    pub fn projects(&self) -> RepoResult<ProjectService<SqliteProjectRepository<'_>>> {
        Ok(ProjectService::new(SqliteProjectRepository::try_new(
            &self.conn,
        )?))
    }

    pub fn offset(&self) -> FixedOffset {
        self.config.offset()
    }

    /// Wall clock captured once at startup so one run sees one "now".
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Local calendar day of [`Context::now`].
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset()).date_naive()
    }
}

/// clap value parser for domain keys.
pub fn parse_domain(value: &str) -> Result<Domain, String> {
    Domain::parse(value).ok_or_else(|| {
        let keys: Vec<&str> = Domain::ALL.iter().map(|domain| domain.key()).collect();
        format!("unknown domain `{value}`; expected one of {}", keys.join(", "))
    })
}

/// clap value parser for `YYYY-MM-DD` dates or RFC 3339 timestamps.
pub fn parse_when(value: &str) -> Result<DateTime<Utc>, String> {
    parse_record_date(value)
        .ok_or_else(|| format!("`{value}` is neither YYYY-MM-DD nor an RFC 3339 timestamp"))
}

pub fn parse_id(value: &str) -> Result<Uuid, Box<dyn Error>> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("`{value}` is not a valid id").into())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line human rendering of an entry.
pub fn describe_entry(entry: &Entry, offset: &FixedOffset) -> String {
    let mut line = format!(
        "{}  {}  {}",
        entry.id,
        entry.recorded_at.with_timezone(offset).format("%Y-%m-%d %H:%M"),
        entry.kind
    );
    if let Some(amount) = entry.amount {
        line.push_str(&format!("  amount={amount}"));
    }
    if let Some(value) = &entry.value {
        line.push_str(&format!("  value={value:?}"));
    }
    if let Some(category) = &entry.category {
        line.push_str(&format!("  category={category}"));
    }
    if let Some(mood) = &entry.mood {
        line.push_str(&format!("  mood={mood}"));
    }
    if let Some(completed) = entry.completed {
        line.push_str(if completed { "  [x]" } else { "  [ ]" });
    }
    if let Some(notes) = &entry.notes {
        line.push_str(&format!("  notes={notes:?}"));
    }
    line
}
