//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// switchws - Switch a developer workspace to a verified build
///
/// Without -b the newest build that succeeded and still has its artifacts in
/// the drop folder is used.
///
/// Examples:
///   switchws --ws TempWorkspace
///   switchws --ws TempWorkspace -b Product.Main_20240101.1
///   switchws --ws TempWorkspace -m
#[derive(Parser, Debug)]
#[command(name = "switchws")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Workspace name below the configured workspace root
    #[arg(short = 'w', long = "ws", value_name = "NAME")]
    pub workspace: Option<String>,

    /// Build number to switch to instead of the newest usable one
    #[arg(short, long, value_name = "BUILD")]
    pub build: Option<String>,

    /// Only pin modules; leave branch sources and artifacts alone
    #[arg(short, long)]
    pub modules_only: bool,

    /// Create a missing workspace without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Configuration file (default: ./switchws.toml, then the user config dir)
    #[arg(short, long, env = "SWITCHWS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
