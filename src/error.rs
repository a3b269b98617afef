//! Error types for gpush modules using thiserror.
//!
//! Everything raised below the workflow layer ends up in [`GpushError`], a
//! closed taxonomy where each variant maps to one process exit code.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::llm::Provider;

/// Top-level error taxonomy. Each variant carries a fixed exit code.
#[derive(Error, Debug)]
pub enum GpushError {
    #[error("No changes detected. Stage your changes first with `git add`")]
    NoChanges,

    #[error("Operation cancelled. No commit was created.")]
    Cancelled,

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Failed to generate commit message: {0}")]
    Generation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No git diff available")]
    InvalidDiff,

    #[error(transparent)]
    GitOperation(#[from] GitError),
}

impl GpushError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GpushError::NoChanges | GpushError::Cancelled | GpushError::GitOperation(_) => 1,
            GpushError::Configuration(_) => 2,
            GpushError::Generation(_) => 3,
            GpushError::Provider(_) => 4,
            GpushError::InvalidDiff => 5,
        }
    }
}

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    /// Missing, invalid, or expired credentials.
    Credentials,
    /// The endpoint could not be reached.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The backend throttled the request (HTTP 429).
    RateLimited,
    /// Any other backend or decoding failure.
    Api,
}

impl ProviderFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFailure::Credentials => "credentials",
            ProviderFailure::Network => "network",
            ProviderFailure::Timeout => "timeout",
            ProviderFailure::RateLimited => "rate limited",
            ProviderFailure::Api => "api",
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call to an LLM provider, already rewritten into a user-facing message.
#[derive(Error, Debug)]
#[error("AI API Error ({provider}): {message}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderFailure,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderFailure, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }
}

/// Errors from reading or writing the configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine the configuration directory. Set GPUSH_CONFIG_DIR.")]
    NoConfigDir,

    #[error("Failed to read configuration file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write configuration file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file is not valid TOML: {0}")]
    ParseFailed(#[source] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[source] toml::ser::Error),

    #[error("Unknown AI provider '{0}'. Supported providers: openai, bedrock")]
    UnknownProvider(String),

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("No {label} configured. {hint}")]
    MissingCredential {
        label: &'static str,
        hint: &'static str,
    },

    #[error(
        "Invalid API key format. API key should start with \"sk-\" followed by letters and numbers"
    )]
    InvalidApiKey,

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("No API key entered and the session is not interactive. {0}")]
    NotInteractive(&'static str),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read repository status: {0}")]
    StatusFailed(#[source] git2::Error),

    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed {
        operation: &'static str,
        stderr: String,
    },

    #[error(
        "Commit {commit} was created locally, but git push failed: {detail}\n\
         Your local branch is ahead of the remote. Fix the problem and run `git push` to publish it."
    )]
    PushFailed { commit: String, detail: String },
}
