//! Project/task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Task inserts require an existing parent project.
//! - Deleting a project removes its tasks through `ON DELETE CASCADE`.

use crate::model::entry::from_epoch_ms;
use crate::model::project::{Project, ProjectId, ProjectStatus, Task, TaskId};
use crate::repo::entry_repo::{RepoError, RepoResult};
use crate::repo::schema::{bool_to_int, ensure_table_ready, int_to_bool};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at,
    status
FROM projects";

const TASK_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    title,
    completed,
    created_at,
    completed_at
FROM tasks";

/// Repository interface for projects and their tasks.
pub trait ProjectRepository {
    fn insert_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Returns `false` when the project is absent.
    fn update_project(&self, project: &Project) -> RepoResult<bool>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    /// Deletes a project and its tasks. Returns `false` when absent.
    fn delete_project(&self, id: ProjectId) -> RepoResult<bool>;

    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<bool>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<bool>;

    /// Removes every project and task, returning `(projects, tasks)` removed.
    fn clear_all(&self) -> RepoResult<(usize, usize)>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "projects",
            &["id", "name", "description", "created_at", "status"],
        )?;
        ensure_table_ready(
            conn,
            "tasks",
            &[
                "id",
                "project_id",
                "title",
                "completed",
                "created_at",
                "completed_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn insert_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (id, name, description, created_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.description.as_deref(),
                project.created_at.timestamp_millis(),
                project.status.as_str(),
            ],
        )?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<bool> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET name = ?1, description = ?2, status = ?3
             WHERE id = ?4;",
            params![
                project.name.as_str(),
                project.description.as_deref(),
                project.status.as_str(),
                project.id.to_string(),
            ],
        )?;

        Ok(changed > 0)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let parent_exists = self
            .conn
            .query_row(
                "SELECT 1 FROM projects WHERE id = ?1;",
                [task.project_id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !parent_exists {
            return Err(RepoError::ProjectNotFound(task.project_id));
        }

        self.conn.execute(
            "INSERT INTO tasks (id, project_id, title, completed, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.to_string(),
                task.project_id.to_string(),
                task.title.as_str(),
                bool_to_int(task.completed),
                task.created_at.timestamp_millis(),
                task.completed_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<bool> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, completed = ?2, completed_at = ?3
             WHERE id = ?4;",
            params![
                task.title.as_str(),
                bool_to_int(task.completed),
                task.completed_at.map(|at| at.timestamp_millis()),
                task.id.to_string(),
            ],
        )?;

        Ok(changed > 0)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Task>> {
        let mut tasks = Vec::new();
        match project_id {
            Some(project_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{TASK_SELECT_SQL} WHERE project_id = ?1 ORDER BY created_at ASC, id ASC;"
                ))?;
                let mut rows = stmt.query([project_id.to_string()])?;
                while let Some(row) = rows.next()? {
                    tasks.push(parse_task_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{TASK_SELECT_SQL} ORDER BY created_at ASC, id ASC;"
                ))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    tasks.push(parse_task_row(row)?);
                }
            }
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn clear_all(&self) -> RepoResult<(usize, usize)> {
        let tasks = self.conn.execute("DELETE FROM tasks;", [])?;
        let projects = self.conn.execute("DELETE FROM projects;", [])?;
        Ok((projects, tasks))
    }
}

fn parse_uuid(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn parse_timestamp(millis: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    from_epoch_ms(millis)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{millis}` in {column}")))
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let status_text: String = row.get("status")?;
    let status = ProjectStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid project status `{status_text}` in projects.status"
        ))
    })?;

    let project = Project {
        id: parse_uuid(row, "id", "projects")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: parse_timestamp(row.get("created_at")?, "projects.created_at")?,
        status,
    };
    project.validate()?;
    Ok(project)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
        Some(millis) => Some(parse_timestamp(millis, "tasks.completed_at")?),
        None => None,
    };

    let task = Task {
        id: parse_uuid(row, "id", "tasks")?,
        project_id: parse_uuid(row, "project_id", "tasks")?,
        title: row.get("title")?,
        completed: int_to_bool(row.get("completed")?, "tasks.completed")?,
        created_at: parse_timestamp(row.get("created_at")?, "tasks.created_at")?,
        completed_at,
    };
    task.validate()?;
    Ok(task)
}
