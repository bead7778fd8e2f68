//! Interactive prompts
//!
//! Uses dialoguer for terminal-based confirmation.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use switch_core::{WorkspaceConfirm, WorkspacePlan};

/// Asks on the terminal before creating a workspace.
///
/// Without a terminal on stdin nothing can be asked, so the plan is declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConfirm;

impl WorkspaceConfirm for PromptConfirm {
    fn confirm_create(&self, plan: &WorkspacePlan) -> io::Result<bool> {
        if !io::stdin().is_terminal() {
            tracing::warn!("No terminal to ask on; rerun with --yes to {plan}");
            return Ok(false);
        }
        let accepted = Confirm::new()
            .with_prompt(format!("No workspace found. {plan}?"))
            .default(false)
            .interact()
            .map_err(|dialoguer::Error::IO(e)| e)?;
        Ok(accepted)
    }
}
