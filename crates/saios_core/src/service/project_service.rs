//! Project/task use-case service.
//!
//! # Invariants
//! - Deleting a project always removes its tasks.
//! - Task toggles keep `completed_at` consistent with `completed`.

use crate::model::project::{Project, ProjectId, ProjectStatus, Task, TaskId};
use crate::repo::entry_repo::RepoResult;
use crate::repo::project_repo::ProjectRepository;
use crate::stats::summary::{project_progress, ProjectProgress};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

/// Project listing with its tasks and derived progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOverview {
    pub project: Project,
    pub tasks: Vec<Task>,
    pub progress: ProjectProgress,
}

pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an active project.
    pub fn create_project(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> RepoResult<Project> {
        self.create_project_at(name, description, Utc::now())
    }

    pub fn create_project_at(
        &self,
        name: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Project> {
        let project = Project::new(name, description, created_at);
        self.repo.insert_project(&project)?;
        info!(
            "event=project_create module=service status=ok id={}",
            project.id
        );
        Ok(project)
    }

    /// Lists projects, newest first.
    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.list_projects()
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.get_project(id)
    }

    /// Sets the project status. Returns `None` when the project is absent.
    pub fn set_status(&self, id: ProjectId, status: ProjectStatus) -> RepoResult<Option<Project>> {
        let Some(mut project) = self.repo.get_project(id)? else {
            return Ok(None);
        };
        project.status = status;
        if !self.repo.update_project(&project)? {
            return Ok(None);
        }
        Ok(Some(project))
    }

    /// Deletes a project together with all of its tasks.
    pub fn delete_project(&self, id: ProjectId) -> RepoResult<bool> {
        let removed = self.repo.delete_project(id)?;
        if removed {
            info!("event=project_delete module=service status=ok id={id} cascade=tasks");
        } else {
            debug!("event=project_delete module=service status=skipped reason=not_found id={id}");
        }
        Ok(removed)
    }

    /// Adds an open task under `project_id`.
    pub fn add_task(&self, project_id: ProjectId, title: impl Into<String>) -> RepoResult<Task> {
        self.add_task_at(project_id, title, Utc::now())
    }

    pub fn add_task_at(
        &self,
        project_id: ProjectId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Task> {
        let task = Task::new(project_id, title, created_at);
        self.repo.insert_task(&task)?;
        info!(
            "event=task_add module=service status=ok id={} project_id={}",
            task.id, project_id
        );
        Ok(task)
    }

    pub fn list_tasks(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(Some(project_id))
    }

    pub fn list_all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(None)
    }

    /// Flips task completion. Returns `None` when the task is absent.
    pub fn toggle_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.toggle_task_at(id, Utc::now())
    }

    pub fn toggle_task_at(&self, id: TaskId, now: DateTime<Utc>) -> RepoResult<Option<Task>> {
        let Some(mut task) = self.repo.get_task(id)? else {
            return Ok(None);
        };
        task.toggle(now);
        if !self.repo.update_task(&task)? {
            return Ok(None);
        }
        Ok(Some(task))
    }

    pub fn delete_task(&self, id: TaskId) -> RepoResult<bool> {
        self.repo.delete_task(id)
    }

    /// Lists every project with its tasks and progress.
    pub fn overview(&self) -> RepoResult<Vec<ProjectOverview>> {
        let projects = self.repo.list_projects()?;
        let all_tasks = self.repo.list_tasks(None)?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let tasks: Vec<Task> = all_tasks
                    .iter()
                    .filter(|task| task.project_id == project.id)
                    .cloned()
                    .collect();
                let progress = project_progress(&tasks);
                ProjectOverview {
                    project,
                    tasks,
                    progress,
                }
            })
            .collect())
    }
}
