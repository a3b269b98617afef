//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use gpush::{CommitMessageProvider, GpushError, Interaction, Provider};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new git repository with one commit, configured for the git CLI.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        let test_repo = Self { dir, repo };
        test_repo.commit_file("README.md", "# test\n", "chore: initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write, stage and commit a file. Returns the commit OID.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        self.stage(name, content);

        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write a file and add it to the index.
    pub fn stage(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("Failed to write test file");
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new(name))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Current branch name.
    pub fn branch_name(&self) -> String {
        self.repo
            .head()
            .expect("No HEAD")
            .shorthand()
            .expect("HEAD has no name")
            .to_string()
    }

    /// Message of the HEAD commit, without the trailing newline.
    pub fn head_message(&self) -> String {
        let commit = self.repo.head().unwrap().peel_to_commit().unwrap();
        commit.message().unwrap().trim_end().to_string()
    }

    pub fn head_id(&self) -> Oid {
        self.repo.head().unwrap().peel_to_commit().unwrap().id()
    }

    /// Attach a bare `origin` and push the current branch upstream.
    pub fn with_bare_remote(&self) -> BareRemote {
        let dir = tempfile::tempdir().expect("Failed to create remote dir");
        let bare = Repository::init_bare(dir.path()).expect("Failed to init bare repo");
        self.repo
            .remote("origin", dir.path().to_str().unwrap())
            .expect("Failed to add remote");

        let branch = self.branch_name();
        git(self.path(), &["push", "-u", "origin", &branch]);

        BareRemote { dir, repo: bare }
    }
}

/// A bare repository acting as `origin`.
pub struct BareRemote {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl BareRemote {
    /// Tip of `branch`, if the branch exists on the remote.
    pub fn branch_tip(&self, branch: &str) -> Option<Oid> {
        self.repo
            .find_reference(&format!("refs/heads/{branch}"))
            .ok()
            .and_then(|r| r.target())
    }
}

/// Run the git CLI in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Provider that returns a canned response and records the diffs it saw.
pub struct FakeProvider {
    pub response: String,
    pub seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CommitMessageProvider for FakeProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate_commit_message(&self, diff: &str) -> Result<String, GpushError> {
        self.seen.lock().unwrap().push(diff.to_string());
        Ok(self.response.clone())
    }
}

/// Interaction that answers confirmations with a fixed value and records output.
pub struct ScriptedUi {
    pub approve: bool,
    pub interactive: bool,
    pub lines: Mutex<Vec<String>>,
    pub confirmations: Mutex<usize>,
}

impl ScriptedUi {
    pub fn approving() -> Self {
        Self::new(true)
    }

    pub fn declining() -> Self {
        Self::new(false)
    }

    fn new(approve: bool) -> Self {
        Self {
            approve,
            interactive: true,
            lines: Mutex::new(Vec::new()),
            confirmations: Mutex::new(0),
        }
    }

    pub fn output(&self) -> String {
        self.lines.lock().unwrap().join("\n")
    }

    pub fn confirmations(&self) -> usize {
        *self.confirmations.lock().unwrap()
    }
}

impl Interaction for ScriptedUi {
    fn confirm(&self, _prompt: &str, _default: bool) -> Result<bool, GpushError> {
        *self.confirmations.lock().unwrap() += 1;
        Ok(self.approve)
    }

    fn report(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn report_error(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn prompt_secret(&self, _label: &str) -> Result<String, GpushError> {
        Err(GpushError::Cancelled)
    }

    fn select(&self, _prompt: &str, _items: &[String]) -> Result<usize, GpushError> {
        Err(GpushError::Cancelled)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
