//! User interaction seam.
//!
//! The workflow and command handlers never talk to the terminal directly.
//! They go through [`Interaction`], which the binary backs with
//! [`TerminalUi`] and tests back with a mock.

pub mod terminal;

use crate::error::GpushError;

pub use terminal::TerminalUi;

/// Confirmation, reporting and input capability.
#[cfg_attr(test, mockall::automock)]
pub trait Interaction: Send + Sync {
    /// Ask a yes/no question. A dismissed prompt is [`GpushError::Cancelled`].
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, GpushError>;

    /// Show a progress or result line.
    fn report(&self, message: &str);

    /// Show an error line.
    fn report_error(&self, message: &str);

    /// Read a secret without echoing it.
    fn prompt_secret(&self, label: &str) -> Result<String, GpushError>;

    /// Pick one of `items`, returning its index.
    fn select(&self, prompt: &str, items: &[String]) -> Result<usize, GpushError>;

    /// Whether prompts can be answered by a person.
    fn is_interactive(&self) -> bool;
}
