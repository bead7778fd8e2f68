//! The workspace switch
//!
//! Wires the configured backends into the orchestrator and prints what the
//! run did.

use colored::Colorize;
use switch_build::DropBuildServer;
use switch_core::{
    AssumeYes, ModuleOutcome, RunReport, SwitchConfig, SyncOrchestrator, SyncRequest,
    WorkspaceConfirm,
};
use switch_mirror::CommandLauncher;
use switch_vcs::GitDepot;

use crate::error::Result;
use crate::interactive::PromptConfirm;
use crate::progress::ConsoleProgress;

/// Options of a switch run taken from the command line.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub workspace: String,
    pub build: Option<String>,
    pub modules_only: bool,
    pub assume_yes: bool,
}

/// Switch the workspace to a build.
pub fn run_sync(config: &SwitchConfig, args: SyncArgs) -> Result<()> {
    println!(
        "{} Switching workspace {}...",
        "=>".blue().bold(),
        args.workspace.cyan()
    );

    let depot = GitDepot::open(&config.server)?;
    let builds = DropBuildServer::new(&config.build_location);
    let launcher = CommandLauncher::new(config.mirror.tool, config.mirror.retry_policy());
    let confirm: &dyn WorkspaceConfirm = if args.assume_yes {
        &AssumeYes
    } else {
        &PromptConfirm
    };

    let request = SyncRequest {
        build: args.build,
        modules_only: args.modules_only,
        ..SyncRequest::new(args.workspace)
    };

    let mut progress = ConsoleProgress::default();
    let report = SyncOrchestrator::new(config, &depot, &builds, &launcher, confirm)
        .run(&request, &mut progress)?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    println!(
        "{} Build {} ({}, changeset {})",
        "OK".green().bold(),
        report.build.number.cyan(),
        report.build.status,
        report.revision
    );
    if report.workspace_created {
        println!(
            "   {} created workspace at {}",
            "+".green(),
            report.workspace.display()
        );
    }
    if let Some(sources) = &report.sources {
        println!("   {} sources: {}", "-".blue(), sources);
    }
    if let Some(mirror) = &report.mirror {
        if mirror.outcome.success {
            println!("   {} artifacts mirrored", "-".blue());
        } else {
            println!(
                "   {} artifact mirror reported failure (exit code {}), see the log",
                "!".yellow().bold(),
                mirror
                    .outcome
                    .exit_code
                    .map_or_else(|| "none".to_string(), |c| c.to_string())
            );
        }
    }
    for module in &report.modules {
        match module {
            ModuleOutcome::Synced { .. } => println!("   {} {}", "-".blue(), module),
            ModuleOutcome::Skipped { .. } => {
                println!("   {} {}", "SKIPPED".yellow().bold(), module)
            }
        }
    }
}
