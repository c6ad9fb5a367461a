//! Project and task management commands.

use clap::Subcommand;
use saios_core::stats::summary::portfolio_stats;
use saios_core::ProjectStatus;

use super::{parse_id, print_json, CommandResult, Context};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Add {
        /// Project name
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List projects with their tasks and progress
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete a project and all of its tasks
    Delete {
        /// Project id
        id: String,
    },
    /// Set project status (active, completed, archived)
    Status {
        /// Project id
        id: String,
        #[arg(value_parser = parse_status)]
        status: ProjectStatus,
    },
    /// Task management within a project
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add an open task to a project
    Add {
        /// Parent project id
        project: String,
        /// Task title
        title: String,
    },
    /// Flip task completion
    Toggle {
        /// Task id
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },
}

fn parse_status(value: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(value).ok_or_else(|| {
        format!("unknown status `{value}`; expected active, completed or archived")
    })
}

pub fn run(ctx: &Context, action: ProjectAction) -> CommandResult {
    let projects = ctx.projects()?;

    match action {
        ProjectAction::Add { name, description } => {
            let project = projects.create_project(name, description)?;
            println!("Project created: {}", project.id);
        }
        ProjectAction::List { json } => {
            let overview = projects.overview()?;
            if json {
                return print_json(&overview);
            }
            if overview.is_empty() {
                println!("No projects");
                return Ok(());
            }

            let all_projects: Vec<_> = overview.iter().map(|item| item.project.clone()).collect();
            let all_tasks: Vec<_> = overview
                .iter()
                .flat_map(|item| item.tasks.iter().cloned())
                .collect();
            let portfolio = portfolio_stats(&all_projects, &all_tasks);

            for item in &overview {
                println!(
                    "{}  {} [{}]  {:.1}% ({}/{})",
                    item.project.id,
                    item.project.name,
                    item.project.status.as_str(),
                    item.progress.percentage,
                    item.progress.completed,
                    item.progress.total
                );
                for task in &item.tasks {
                    let mark = if task.completed { "[x]" } else { "[ ]" };
                    println!("    {mark} {}  {}", task.id, task.title);
                }
            }
            println!(
                "Overall: {:.1}% of {} tasks, {}/{} projects complete",
                portfolio.overall_progress,
                portfolio.total_tasks,
                portfolio.completed_projects,
                portfolio.total_projects
            );
        }
        ProjectAction::Delete { id } => {
            let id = parse_id(&id)?;
            if projects.delete_project(id)? {
                println!("Deleted project {id}");
            } else {
                println!("No project {id}");
            }
        }
        ProjectAction::Status { id, status } => {
            let id = parse_id(&id)?;
            match projects.set_status(id, status)? {
                Some(project) => println!("{} is now {}", project.name, project.status.as_str()),
                None => println!("No project {id}"),
            }
        }
        ProjectAction::Task { action } => match action {
            TaskAction::Add { project, title } => {
                let task = projects.add_task(parse_id(&project)?, title)?;
                println!("Task created: {}", task.id);
            }
            TaskAction::Toggle { id } => {
                let id = parse_id(&id)?;
                match projects.toggle_task(id)? {
                    Some(task) => {
                        let state = if task.completed { "done" } else { "open" };
                        println!("{} is {state}", task.title);
                    }
                    None => println!("No task {id}"),
                }
            }
            TaskAction::Delete { id } => {
                let id = parse_id(&id)?;
                if projects.delete_task(id)? {
                    println!("Deleted task {id}");
                } else {
                    println!("No task {id}");
                }
            }
        },
    }
    Ok(())
}
