//! switchws
//!
//! Switches a developer workspace to a verified build: sources at the
//! build's changeset, artifacts from the drop folder and modules at the
//! versions the branch declares.

mod cli;
mod commands;
mod error;
mod interactive;
mod progress;

use clap::Parser;
use colored::Colorize;
use switch_core::{SwitchConfig, logging};

use cli::{Cli, Commands};
use commands::SyncArgs;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        commands::run_completions(shell);
        return Ok(());
    }

    let workspace = cli
        .workspace
        .ok_or(CliError::WorkspaceRequired)?;

    let cwd = std::env::current_dir()?;
    let config = SwitchConfig::discover(cli.config.as_deref(), &cwd)?;

    if let Err(e) = logging::init(config.log_file.as_deref(), cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    commands::run_sync(
        &config,
        SyncArgs {
            workspace,
            build: cli.build,
            modules_only: cli.modules_only,
            assume_yes: cli.yes,
        },
    )
}
