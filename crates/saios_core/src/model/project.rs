//! Project and task model.
//!
//! # Invariants
//! - A task always references an existing project; deleting the project
//!   deletes its tasks.
//! - `completed_at` is set iff `completed` is true.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::model::entry::truncate_to_millis;

pub type ProjectId = Uuid;
pub type TaskId = Uuid;

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validation failures for project and task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    BlankName,
    BlankTitle,
    CompletionMismatch(TaskId),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "project name must not be blank"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::CompletionMismatch(id) => {
                write!(f, "task {id} completion flag and completed_at disagree")
            }
        }
    }
}

impl Error for ProjectValidationError {}

impl Project {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description,
            created_at: truncate_to_millis(created_at),
            status: ProjectStatus::Active,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        Ok(())
    }
}

impl Task {
    pub fn new(project_id: ProjectId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            title: title.into(),
            completed: false,
            created_at: truncate_to_millis(created_at),
            completed_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProjectValidationError::BlankTitle);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(ProjectValidationError::CompletionMismatch(self.id));
        }
        Ok(())
    }

    /// Flips completion; completing stamps `completed_at`, reopening clears it.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = self.completed.then(|| truncate_to_millis(now));
    }
}
