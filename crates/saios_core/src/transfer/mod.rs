//! Whole-store export and import.
//!
//! # Responsibility
//! - Snapshot every collection into one JSON bundle.
//! - Restore collections from a bundle atomically.
//!
//! # Invariants
//! - Import parses and validates the full bundle before touching storage.
//! - Import writes happen in one transaction; any failure leaves the store
//!   exactly as it was.
//! - Collections absent from the bundle are left untouched.
//! - A bundle carrying `projects` without `tasks` keeps the stored tasks whose
//!   project id is still present after the import; the rest go with their
//!   project.

pub mod bundle;

use crate::db::DbError;
use crate::model::domain::Domain;
use crate::model::entry::Entry;
use crate::model::project::{Project, ProjectId, Task};
use crate::repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, SqliteEntryRepository,
};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use bundle::{format_record_date, EntryRecord, ExportBundle, ProjectRecord, TaskRecord};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug)]
pub enum TransferError {
    /// Input is not a JSON bundle.
    MalformedJson(serde_json::Error),
    /// A record failed conversion or validation.
    InvalidRecord {
        collection: &'static str,
        index: usize,
        message: String,
    },
    Repo(RepoError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedJson(err) => write!(f, "malformed import file: {err}"),
            Self::InvalidRecord {
                collection,
                index,
                message,
            } => write!(f, "invalid record {collection}[{index}]: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedJson(err) => Some(err),
            Self::InvalidRecord { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for TransferError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::Db(DbError::Sqlite(value)))
    }
}

/// Per-collection record counts written by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub collections: BTreeMap<String, usize>,
}

impl ImportSummary {
    pub fn total_records(&self) -> usize {
        self.collections.values().sum()
    }
}

/// Snapshots every collection.
pub fn export_bundle(conn: &Connection, now: DateTime<Utc>) -> TransferResult<ExportBundle> {
    let entries = SqliteEntryRepository::try_new(conn)?;
    let projects = SqliteProjectRepository::try_new(conn)?;

    let mut bundle = ExportBundle {
        export_date: Some(format_record_date(now)),
        ..ExportBundle::default()
    };

    for domain in Domain::ALL {
        let records = entries
            .list_entries(&EntryListQuery::domain(domain))?
            .iter()
            .map(EntryRecord::from_entry)
            .collect();
        bundle.set_collection(domain, records);
    }

    bundle.projects = Some(
        projects
            .list_projects()?
            .iter()
            .map(ProjectRecord::from_project)
            .collect(),
    );
    bundle.tasks = Some(
        projects
            .list_tasks(None)?
            .iter()
            .map(TaskRecord::from_task)
            .collect(),
    );

    info!("event=export module=transfer status=ok");
    Ok(bundle)
}

/// Serializes a bundle as pretty-printed JSON.
pub fn to_json_pretty(bundle: &ExportBundle) -> TransferResult<String> {
    serde_json::to_string_pretty(bundle).map_err(TransferError::MalformedJson)
}

/// Parses a JSON bundle without touching storage.
pub fn parse_bundle(json: &str) -> TransferResult<ExportBundle> {
    serde_json::from_str(json).map_err(|err| {
        error!("event=import module=transfer status=error error_code=malformed_json error={err}");
        TransferError::MalformedJson(err)
    })
}

struct PreparedImport {
    entries: Vec<(Domain, Vec<Entry>)>,
    projects: Option<Vec<Project>>,
    tasks: Option<Vec<Task>>,
}

fn prepare(bundle: ExportBundle) -> TransferResult<PreparedImport> {
    let mut entries = Vec::new();
    for domain in Domain::ALL {
        if let Some(records) = bundle.collection(domain) {
            let converted = records
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, record)| record.into_entry(domain, index))
                .collect::<TransferResult<Vec<_>>>()?;
            entries.push((domain, converted));
        }
    }

    let projects = bundle
        .projects
        .map(|records| {
            records
                .into_iter()
                .enumerate()
                .map(|(index, record)| record.into_project(index))
                .collect::<TransferResult<Vec<_>>>()
        })
        .transpose()?;

    let tasks = bundle
        .tasks
        .map(|records| {
            records
                .into_iter()
                .enumerate()
                .map(|(index, record)| record.into_task(index))
                .collect::<TransferResult<Vec<_>>>()
        })
        .transpose()?;

    Ok(PreparedImport {
        entries,
        projects,
        tasks,
    })
}

/// Restores collections from a JSON bundle.
///
/// # Errors
/// - `MalformedJson` when the input does not parse.
/// - `InvalidRecord` when any record fails conversion or validation.
/// - `Repo` when a write fails (duplicate ids, task without project).
///
/// In every error case nothing is written.
pub fn import_bundle(conn: &mut Connection, json: &str) -> TransferResult<ImportSummary> {
    let prepared = prepare(parse_bundle(json)?).map_err(|err| {
        error!("event=import module=transfer status=error error_code=invalid_record error={err}");
        err
    })?;

    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();
    {
        let entry_repo = SqliteEntryRepository::try_new(&tx)?;
        for (domain, entries) in &prepared.entries {
            entry_repo.clear_domain(*domain)?;
            for entry in entries {
                entry_repo.insert_entry(entry)?;
            }
            summary
                .collections
                .insert(domain.key().to_string(), entries.len());
        }

        let project_repo = SqliteProjectRepository::try_new(&tx)?;
        if let Some(projects) = &prepared.projects {
            let carried_tasks = if prepared.tasks.is_some() {
                Vec::new()
            } else {
                project_repo.list_tasks(None)?
            };
            project_repo.clear_all()?;
            for project in projects {
                project_repo.insert_project(project)?;
            }
            let imported: HashSet<ProjectId> = projects.iter().map(|project| project.id).collect();
            for task in carried_tasks
                .iter()
                .filter(|task| imported.contains(&task.project_id))
            {
                project_repo.insert_task(task)?;
            }
            summary
                .collections
                .insert("projects".to_string(), projects.len());
        }
        if let Some(tasks) = &prepared.tasks {
            for existing in project_repo.list_tasks(None)? {
                project_repo.delete_task(existing.id)?;
            }
            for task in tasks {
                project_repo.insert_task(task)?;
            }
            summary.collections.insert("tasks".to_string(), tasks.len());
        }
    }
    tx.commit()?;

    info!(
        "event=import module=transfer status=ok collections={} records={}",
        summary.collections.len(),
        summary.total_records()
    );
    Ok(summary)
}
