//! Version-control capability consumed by the push workflow.
//!
//! Reads (staged diff, staged files) go through git2. Writes (commit, push)
//! shell out to the system `git` so hooks, signing and credential helpers
//! behave exactly as they do for the user.

pub mod diff;
pub mod executor;
pub mod status;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::Repository;

use crate::error::GitError;

pub use diff::staged_diff;
pub use status::staged_files;

/// Remote used when an explicit branch is requested.
pub const DEFAULT_REMOTE: &str = "origin";

/// Status of a staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    TypeChanged,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
            FileStatus::TypeChanged => write!(f, "Type changed"),
        }
    }
}

/// A file staged for the next commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: String,
    pub status: FileStatus,
}

/// The commit created by [`GitBackend::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub short_id: String,
}

/// Options for `git push`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub force: bool,
    pub branch: Option<String>,
}

impl PushOptions {
    /// Arguments passed after `git push`.
    ///
    /// Empty when neither force nor branch is requested, so git uses the
    /// configured upstream.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.force {
            args.push("--force".to_string());
        }
        if let Some(branch) = &self.branch {
            args.push(DEFAULT_REMOTE.to_string());
            args.push(branch.clone());
        }
        args
    }
}

/// Git operations used by the workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Unified diff of the index against HEAD. Empty when nothing is staged.
    async fn staged_diff(&self) -> Result<String, GitError>;

    /// Files staged for the next commit.
    async fn staged_files(&self) -> Result<Vec<StagedFile>, GitError>;

    /// Commit the staged tree with `message`.
    async fn commit(&self, message: &str) -> Result<CommitInfo, GitError>;

    /// Push the current branch.
    async fn push(&self, options: &PushOptions) -> Result<(), GitError>;
}

/// [`GitBackend`] for a repository on disk.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    /// Discover the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                GitError::OpenRepository(git2::Error::from_str("bare repositories are not supported"))
            })?;
        Ok(Self { workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::open(&self.workdir).map_err(GitError::OpenRepository)
    }
}

#[async_trait]
impl GitBackend for SystemGit {
    async fn staged_diff(&self) -> Result<String, GitError> {
        staged_diff(&self.open()?)
    }

    async fn staged_files(&self) -> Result<Vec<StagedFile>, GitError> {
        staged_files(&self.open()?)
    }

    async fn commit(&self, message: &str) -> Result<CommitInfo, GitError> {
        executor::commit(&self.workdir, message).await
    }

    async fn push(&self, options: &PushOptions) -> Result<(), GitError> {
        executor::push(&self.workdir, options).await
    }
}
