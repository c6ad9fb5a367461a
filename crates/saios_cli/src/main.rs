//! `saios` command line shell.
//!
//! # Responsibility
//! - Parse arguments and dispatch to one command module per page.
//! - Resolve configuration, start logging and open the store once per run.
//!
//! # Invariants
//! - Failures print `error: ...` to stderr and exit with status 1.

use clap::{Parser, Subcommand};
use log::error;
use saios_core::{init_logging, open_db, AppConfig};
use std::error::Error;
use std::path::PathBuf;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "saios", version, about = "SaiOS personal tracker")]
struct Cli {
    /// Config file (defaults to $SAIOS_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that read or write the tracker database.
#[derive(Subcommand)]
enum StoreCommand {
    /// Log a new entry
    Log(commands::entry::LogArgs),
    /// List entries of one domain
    List(commands::entry::ListArgs),
    /// Edit fields of an entry
    Edit(commands::entry::EditArgs),
    /// Flip the completion flag of an entry
    Toggle {
        /// Entry id
        id: String,
    },
    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
    },
    /// Day-bucketed series over a trailing window
    Chart(commands::chart::ChartArgs),
    /// Completion or clean streaks
    Streak(commands::streak::StreakArgs),
    /// Summary statistics for one domain
    Stats(commands::stats::StatsArgs),
    /// Overview of every domain
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Project and task management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Write a JSON backup of every collection
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Restore collections from a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("event=cli_command module=cli status=error error={e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = AppConfig::resolve_path(cli.config.as_deref())?;
    match cli.command {
        Commands::Config { action } => commands::config::run(action, &config_path),
        Commands::Store(command) => {
            let config = AppConfig::load_from(&config_path)?;
            if let Some(log_dir) = &config.log_dir {
                init_logging(&config.log_level, log_dir)?;
            }
            let conn = open_db(&config.db_path)?;
            let mut ctx = Context::new(config, conn);
            dispatch(&mut ctx, command)
        }
    }
}

fn dispatch(ctx: &mut Context, command: StoreCommand) -> Result<(), Box<dyn Error>> {
    match command {
        StoreCommand::Log(args) => commands::entry::log(ctx, args),
        StoreCommand::List(args) => commands::entry::list(ctx, args),
        StoreCommand::Edit(args) => commands::entry::edit(ctx, args),
        StoreCommand::Toggle { id } => commands::entry::toggle(ctx, &id),
        StoreCommand::Delete { id } => commands::entry::delete(ctx, &id),
        StoreCommand::Chart(args) => commands::chart::run(ctx, args),
        StoreCommand::Streak(args) => commands::streak::run(ctx, args),
        StoreCommand::Stats(args) => commands::stats::run(ctx, args),
        StoreCommand::Dashboard { json } => commands::stats::dashboard(ctx, json),
        StoreCommand::Project { action } => commands::project::run(ctx, action),
        StoreCommand::Export { out } => commands::transfer::export(ctx, out.as_deref()),
        StoreCommand::Import { file } => commands::transfer::import(ctx, &file),
    }
}
