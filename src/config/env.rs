//! Settings read from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Default cap on the diff text sent to a provider, in characters.
pub const DEFAULT_MAX_DIFF_LENGTH: usize = 4000;

/// Default timeout for a single provider request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const MAX_DIFF_LENGTH_ENV_VAR: &str = "GPUSH_MAX_DIFF_LENGTH";
pub const TIMEOUT_ENV_VAR: &str = "GPUSH_TIMEOUT";
pub const CONFIG_DIR_ENV_VAR: &str = "GPUSH_CONFIG_DIR";
pub const OPENAI_BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
pub const BEDROCK_ENDPOINT_ENV_VAR: &str = "AWS_ENDPOINT_URL_BEDROCK_RUNTIME";
pub const BEDROCK_TOKEN_ENV_VAR: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Read a positive integer from the environment, warning on bad values.
fn positive_from_env(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!("Invalid {} value '{}', using default {}", var, v, default);
                default
            }
        },
        _ => default,
    }
}

/// Maximum diff length from `GPUSH_MAX_DIFF_LENGTH`, or 4000.
pub fn max_diff_length() -> usize {
    let default = DEFAULT_MAX_DIFF_LENGTH as u64;
    usize::try_from(positive_from_env(MAX_DIFF_LENGTH_ENV_VAR, default))
        .unwrap_or(DEFAULT_MAX_DIFF_LENGTH)
}

/// Provider request timeout from `GPUSH_TIMEOUT` (seconds), or 60s.
pub fn request_timeout() -> Duration {
    Duration::from_secs(positive_from_env(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS))
}

/// Non-empty string from the environment.
pub fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Directory override for the configuration store.
pub fn config_dir_override() -> Option<PathBuf> {
    non_empty(CONFIG_DIR_ENV_VAR).map(PathBuf::from)
}
