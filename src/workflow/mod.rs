//! Push workflow: stage check, message generation, confirmation, commit, push.
//!
//! States run strictly in order and none is re-entered:
//! collect diff, generate, extract, report, dry-run check, confirm,
//! commit and push, done.

use std::time::Duration;

use tracing::{debug, info};

use crate::commit::generate_commit_message;
use crate::config::Config;
use crate::error::{GitError, GpushError};
use crate::git::{GitBackend, PushOptions};
use crate::llm::CommitMessageProvider;
use crate::ui::Interaction;

/// Options for one push, derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct PushRequest {
    pub dry_run: bool,
    pub force: bool,
    pub branch: Option<String>,
    /// Approve the generated message without prompting.
    pub assume_yes: bool,
}

impl PushRequest {
    fn push_options(&self) -> PushOptions {
        PushOptions {
            force: self.force,
            branch: self.branch.clone(),
        }
    }
}

/// Bounds applied to the provider call.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_diff_length: usize,
    pub timeout: Duration,
}

impl Limits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_diff_length: config.max_diff_length(),
            timeout: config.request_timeout(),
        }
    }
}

/// How a successful push run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Dry run: message generated, nothing committed.
    DryRun { message: String },
    /// Commit created and pushed.
    Pushed { message: String, commit: String },
}

/// Run the push workflow once.
pub async fn run_push(
    git: &dyn GitBackend,
    provider: &dyn CommitMessageProvider,
    ui: &dyn Interaction,
    request: &PushRequest,
    limits: Limits,
) -> Result<PushOutcome, GpushError> {
    // ── Collect diff ──
    let diff = git.staged_diff().await?;
    if diff.trim().is_empty() {
        return Err(GpushError::NoChanges);
    }

    let files = git.staged_files().await?;
    ui.report(&format!("  [DONE] {} staged file(s)", files.len()));
    for file in &files {
        debug!("staged: {} ({})", file.path, file.status);
    }

    // ── Generate and extract ──
    ui.report(&format!(
        "  [....] Generating commit message with {}",
        provider.provider()
    ));
    let message =
        generate_commit_message(provider, &diff, limits.max_diff_length, limits.timeout).await?;

    // ── Report ──
    ui.report("");
    ui.report("Generated commit message:");
    ui.report("");
    for line in message.lines() {
        ui.report(&format!("  {line}"));
    }
    ui.report("");

    // ── Dry-run check ──
    if request.dry_run {
        ui.report("Dry run complete. No commit was created.");
        return Ok(PushOutcome::DryRun { message });
    }

    // ── Confirm ──
    confirm_message(ui, request)?;

    // ── Commit and push ──
    let commit = git.commit(&message).await?;
    ui.report(&format!("  [DONE] Created commit {}", commit.short_id));

    let options = request.push_options();
    git.push(&options).await.map_err(|e| match e {
        GitError::CommandFailed { stderr, .. } => GitError::PushFailed {
            commit: commit.short_id.clone(),
            detail: stderr,
        },
        other => GitError::PushFailed {
            commit: commit.short_id.clone(),
            detail: other.to_string(),
        },
    })?;

    let target = options
        .branch
        .as_deref()
        .map(|b| format!(" to {}/{}", crate::git::DEFAULT_REMOTE, b))
        .unwrap_or_default();
    ui.report(&format!("  [DONE] Pushed{target}"));
    info!("Pushed commit {}", commit.short_id);

    Ok(PushOutcome::Pushed {
        message,
        commit: commit.short_id,
    })
}

/// Explicit approval of the generated message.
fn confirm_message(ui: &dyn Interaction, request: &PushRequest) -> Result<(), GpushError> {
    if request.assume_yes {
        debug!("Confirmation skipped (--yes)");
        return Ok(());
    }

    if !ui.is_interactive() {
        ui.report_error("Not a terminal. Re-run with --yes to approve without prompting.");
        return Err(GpushError::Cancelled);
    }

    if ui.confirm("Commit and push with this message?", true)? {
        Ok(())
    } else {
        Err(GpushError::Cancelled)
    }
}
