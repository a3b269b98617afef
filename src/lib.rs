//! gpush - draft commit messages for staged changes with an LLM, then commit and push.
//!
//! # Overview
//!
//! gpush reads the staged diff, asks the configured provider (OpenAI chat
//! completions or AWS Bedrock) for a conventional commit message, shows it
//! for approval, and runs `git commit` and `git push` with it.

pub mod commands;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, ConfigKey};
pub use error::{ConfigError, GitError, GpushError, ProviderError, ProviderFailure};
pub use git::{GitBackend, PushOptions, SystemGit};
pub use llm::{CommitMessageProvider, Provider, build_provider};
pub use ui::{Interaction, TerminalUi};
pub use workflow::{Limits, PushOutcome, PushRequest, run_push};
