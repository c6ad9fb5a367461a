//! Configuration management commands.

use clap::Subcommand;
use saios_core::AppConfig;
use std::path::Path;

use super::CommandResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved config file location
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: ConfigAction, path: &Path) -> CommandResult {
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let config = AppConfig::load_from(path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )
                .into());
            }
            AppConfig::default().save_to(path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
