//! Staged file listing from the repository index.

use git2::{Repository, Status, StatusOptions};

use crate::error::GitError;
use crate::git::{FileStatus, StagedFile};

/// Files staged for the next commit, sorted by path.
pub fn staged_files(repo: &Repository) -> Result<Vec<StagedFile>, GitError> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(false)
        .include_ignored(false)
        .renames_head_to_index(true);

    let statuses = repo.statuses(Some(&mut opts)).map_err(GitError::StatusFailed)?;

    let mut files: Vec<StagedFile> = statuses
        .iter()
        .filter_map(|entry| {
            let status = index_status(entry.status())?;
            let path = entry
                .head_to_index()
                .and_then(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
                .map(|p| p.to_string_lossy().to_string())
                .or_else(|| entry.path().map(String::from))?;
            Some(StagedFile { path, status })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn index_status(status: Status) -> Option<FileStatus> {
    if status.contains(Status::INDEX_NEW) {
        Some(FileStatus::Added)
    } else if status.contains(Status::INDEX_RENAMED) {
        Some(FileStatus::Renamed)
    } else if status.contains(Status::INDEX_DELETED) {
        Some(FileStatus::Deleted)
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        Some(FileStatus::TypeChanged)
    } else if status.contains(Status::INDEX_MODIFIED) {
        Some(FileStatus::Modified)
    } else {
        None
    }
}
