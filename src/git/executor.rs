//! Git mutations: commit and push.
//!
//! All operations shell out to the system `git` binary, inheriting the user's
//! existing git config, hooks, SSH agent, and credential store.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::{CommitInfo, PushOptions};

/// Check that a `git` executable is reachable.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Placeholder id when the commit exists but its id could not be read.
pub const UNKNOWN_COMMIT_ID: &str = "unknown";

/// `git commit -m <message>` on the staged tree.
///
/// Once `git commit` succeeds the repository has changed, so a failure to
/// read the new id afterwards is not an error.
pub async fn commit(workdir: &Path, message: &str) -> Result<CommitInfo, GitError> {
    run_git(workdir, &["commit", "-m", message], "commit").await?;
    let short_id = run_git(workdir, &["rev-parse", "--short", "HEAD"], "rev-parse").await;
    Ok(commit_info(short_id))
}

fn commit_info(short_id: Result<String, GitError>) -> CommitInfo {
    let short_id = match short_id {
        Ok(id) if !id.trim().is_empty() => id.trim().to_string(),
        Ok(_) => UNKNOWN_COMMIT_ID.to_string(),
        Err(e) => {
            warn!("Commit created but its id could not be read: {e}");
            UNKNOWN_COMMIT_ID.to_string()
        }
    };
    CommitInfo { short_id }
}

/// `git push [--force] [origin <branch>]`.
pub async fn push(workdir: &Path, options: &PushOptions) -> Result<(), GitError> {
    let extra = options.args();
    let mut args = vec!["push"];
    args.extend(extra.iter().map(String::as_str));
    run_git(workdir, &args, "push").await?;
    Ok(())
}

/// Run a git command in `workdir` and return its stdout.
async fn run_git(workdir: &Path, args: &[&str], operation: &'static str) -> Result<String, GitError> {
    check_git_installed()?;

    debug!("git {}", args.first().copied().unwrap_or_default());
    let started = Instant::now();

    let output = Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| GitError::SpawnFailed { operation, source })?;

    debug!(
        "git {} finished in {:?} with {}",
        operation,
        started.elapsed(),
        output.status
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        // `git commit` reports "nothing to commit" on stdout.
        let detail = if stderr.is_empty() { stdout } else { stderr };
        return Err(GitError::CommandFailed {
            operation,
            stderr: detail,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
