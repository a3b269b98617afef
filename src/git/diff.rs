//! Staged diff collection using git2.

use git2::{DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::{debug, warn};

use crate::error::GitError;

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Unified diff of the index against HEAD (`git diff --cached --diff-algorithm=minimal`).
///
/// Returns an empty string when nothing is staged. Unstaged and untracked
/// changes are ignored.
pub fn staged_diff(repo: &Repository) -> Result<String, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let mut opts = DiffOptions::new();
    opts.minimal(true);

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    let mut text = String::new();
    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        match std::str::from_utf8(line.content()) {
            Ok(content) => text.push_str(content),
            Err(_) => text.push_str(&String::from_utf8_lossy(line.content())),
        }
        true
    }) {
        warn!("Failed to render staged diff: {e}");
        return Err(GitError::DiffFailed(e));
    }

    debug!(
        "Staged diff: {} files, {} chars",
        diff.deltas().len(),
        text.len()
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn init_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        let file_path = dir.join("file.txt");
        std::fs::write(&file_path, "original\n").unwrap();
        {
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("file.txt")).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = git2::Signature::now("Test", "test@test.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();
        }
        repo
    }

    fn stage(repo: &Repository, path: &str) {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_clean_repo_has_empty_diff() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_with_commit(dir.path());
        assert_eq!(staged_diff(&repo).unwrap(), "");
    }

    #[test]
    fn test_unstaged_changes_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_with_commit(dir.path());
        std::fs::write(dir.path().join("file.txt"), "changed\n").unwrap();
        std::fs::write(dir.path().join("untracked.txt"), "new\n").unwrap();

        assert_eq!(staged_diff(&repo).unwrap(), "");
    }

    #[test]
    fn test_staged_modification_is_in_diff() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_with_commit(dir.path());
        std::fs::write(dir.path().join("file.txt"), "modified\n").unwrap();
        stage(&repo, "file.txt");

        let diff = staged_diff(&repo).unwrap();
        assert!(diff.contains("diff --git a/file.txt b/file.txt"));
        assert!(diff.contains("-original\n"));
        assert!(diff.contains("+modified\n"));
    }

    #[test]
    fn test_staged_file_in_unborn_repo() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("new.txt"), "hello\n").unwrap();
        stage(&repo, "new.txt");

        let diff = staged_diff(&repo).unwrap();
        assert!(diff.contains("new.txt"));
        assert!(diff.contains("+hello\n"));
    }

    #[test]
    fn test_corrupt_head_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        init_with_commit(dir.path());

        std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/\0invalid").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let result = staged_diff(&repo);
        assert!(
            matches!(result, Err(GitError::DiffFailed(_))),
            "Expected DiffFailed for corrupt HEAD, got: {:?}",
            result
        );
    }
}
