//! JSON backup bundle records.
//!
//! # Invariants
//! - Every collection is a flat list of field-value records keyed by its
//!   collection name; `exportDate` stamps the bundle.
//! - Record dates are written as RFC 3339 with milliseconds; reading also
//!   accepts bare `YYYY-MM-DD` calendar dates (midnight UTC).

use crate::model::domain::{Domain, JOURNAL_ENTRY_KIND};
use crate::model::entry::{truncate_to_millis, Entry, NewEntry};
use crate::model::project::{Project, ProjectStatus, Task};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TransferError, TransferResult};

/// Whole-store backup document.
///
/// Absent collections deserialize as `None` and are left untouched on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    #[serde(rename = "exportDate", default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mental: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addiction: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rituals: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
}

impl ExportBundle {
    pub fn collection(&self, domain: Domain) -> Option<&Vec<EntryRecord>> {
        match domain {
            Domain::Physical => self.physical.as_ref(),
            Domain::Mental => self.mental.as_ref(),
            Domain::Finance => self.finance.as_ref(),
            Domain::Addiction => self.addiction.as_ref(),
            Domain::Rituals => self.rituals.as_ref(),
            Domain::Journal => self.journal.as_ref(),
        }
    }

    pub fn set_collection(&mut self, domain: Domain, records: Vec<EntryRecord>) {
        let slot = match domain {
            Domain::Physical => &mut self.physical,
            Domain::Mental => &mut self.mental,
            Domain::Finance => &mut self.finance,
            Domain::Addiction => &mut self.addiction,
            Domain::Rituals => &mut self.rituals,
            Domain::Journal => &mut self.journal,
        };
        *slot = Some(records);
    }
}

/// Flat entry record. Legacy field names `count` and `content` are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub date: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "content", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, alias = "count", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Formats a timestamp the way bundle records store it.
pub fn format_record_date(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp, a zone-less ISO timestamp (UTC) or a bare
/// calendar date (midnight UTC).
pub fn parse_record_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(truncate_to_millis(parsed.with_timezone(&Utc)));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(truncate_to_millis(parsed.and_utc()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn invalid(collection: &'static str, index: usize, message: impl Into<String>) -> TransferError {
    TransferError::InvalidRecord {
        collection,
        index,
        message: message.into(),
    }
}

fn parse_id(collection: &'static str, index: usize, field: &str, value: &str) -> TransferResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| invalid(collection, index, format!("{field} `{value}` is not a UUID")))
}

fn parse_date(
    collection: &'static str,
    index: usize,
    field: &str,
    value: &str,
) -> TransferResult<DateTime<Utc>> {
    parse_record_date(value)
        .ok_or_else(|| invalid(collection, index, format!("{field} `{value}` is not a date")))
}

impl EntryRecord {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            date: format_record_date(entry.recorded_at),
            kind: entry.kind.clone(),
            value: entry.value.clone(),
            amount: entry.amount,
            category: entry.category.clone(),
            mood: entry.mood.clone(),
            completed: entry.completed,
            notes: entry.notes.clone(),
        }
    }

    /// Converts into a validated entry of `domain`.
    pub fn into_entry(self, domain: Domain, index: usize) -> TransferResult<Entry> {
        let collection = domain.key();
        let id = parse_id(collection, index, "id", &self.id)?;
        let recorded_at = parse_date(collection, index, "date", &self.date)?;
        let kind = if domain == Domain::Journal && self.kind.trim().is_empty() {
            JOURNAL_ENTRY_KIND.to_string()
        } else {
            self.kind
        };

        let entry = Entry::with_id(
            id,
            domain,
            NewEntry {
                kind,
                value: self.value,
                amount: self.amount,
                category: self.category,
                mood: self.mood,
                completed: self.completed,
                notes: self.notes,
            },
            recorded_at,
        );
        entry
            .validate()
            .map_err(|err| invalid(collection, index, err.to_string()))?;
        Ok(entry)
    }
}

impl ProjectRecord {
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: format_record_date(project.created_at),
            status: project.status,
        }
    }

    pub fn into_project(self, index: usize) -> TransferResult<Project> {
        let project = Project {
            id: parse_id("projects", index, "id", &self.id)?,
            name: self.name,
            description: self.description,
            created_at: parse_date("projects", index, "createdAt", &self.created_at)?,
            status: self.status,
        };
        project
            .validate()
            .map_err(|err| invalid("projects", index, err.to_string()))?;
        Ok(project)
    }
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            project_id: task.project_id.to_string(),
            title: task.title.clone(),
            completed: task.completed,
            created_at: format_record_date(task.created_at),
            completed_at: task.completed_at.map(format_record_date),
        }
    }

    pub fn into_task(self, index: usize) -> TransferResult<Task> {
        let completed_at = match self.completed_at.as_deref() {
            Some(value) => Some(parse_date("tasks", index, "completedAt", value)?),
            None => None,
        };
        let created_at = parse_date("tasks", index, "createdAt", &self.created_at)?;
        // Older bundles may flag a task done without a completion stamp.
        let completed_at = match (self.completed, completed_at) {
            (true, stamp) => Some(stamp.unwrap_or(created_at)),
            (false, _) => None,
        };
        let task = Task {
            id: parse_id("tasks", index, "id", &self.id)?,
            project_id: parse_id("tasks", index, "projectId", &self.project_id)?,
            title: self.title,
            completed: self.completed,
            created_at,
            completed_at,
        };
        task.validate()
            .map_err(|err| invalid("tasks", index, err.to_string()))?;
        Ok(task)
    }
}
