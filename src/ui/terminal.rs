//! Terminal-backed [`Interaction`] using dialoguer.

use std::io::IsTerminal;

use dialoguer::{Confirm, Password, Select};
use tracing::debug;

use crate::error::GpushError;
use crate::ui::Interaction;

/// Prompts on the controlling terminal, reports on stdout and stderr.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }
}

impl Interaction for TerminalUi {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, GpushError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| {
                debug!("Confirmation prompt failed: {e}");
                GpushError::Cancelled
            })
    }

    fn report(&self, message: &str) {
        println!("{message}");
    }

    fn report_error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn prompt_secret(&self, label: &str) -> Result<String, GpushError> {
        Password::new()
            .with_prompt(label)
            .interact()
            .map_err(|e| {
                debug!("Secret prompt failed: {e}");
                GpushError::Cancelled
            })
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<usize, GpushError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| {
                debug!("Selection prompt failed: {e}");
                GpushError::Cancelled
            })
    }

    fn is_interactive(&self) -> bool {
        std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
    }
}
