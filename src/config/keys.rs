//! Named configuration keys, their defaults, and credential helpers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::ConfigError;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_AWS_REGION: &str = "eu-central-1";

/// OpenAI API keys start with `sk-` followed by at least 20 key characters.
static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^sk-[A-Za-z0-9_-]{20,}$").expect("API key pattern is valid")
});

/// A setting persisted in the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Provider,
    OpenAiApiKey,
    OpenAiModel,
    BedrockApiKey,
    BedrockModel,
    AwsRegion,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Provider,
        ConfigKey::OpenAiApiKey,
        ConfigKey::OpenAiModel,
        ConfigKey::BedrockApiKey,
        ConfigKey::BedrockModel,
        ConfigKey::AwsRegion,
    ];

    /// Name of the key in the persisted file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Provider => "provider",
            ConfigKey::OpenAiApiKey => "openai_api_key",
            ConfigKey::OpenAiModel => "openai_model",
            ConfigKey::BedrockApiKey => "bedrock_api_key",
            ConfigKey::BedrockModel => "bedrock_model",
            ConfigKey::AwsRegion => "aws_region",
        }
    }

    /// Value used when the key is absent. Credentials have no default.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            ConfigKey::Provider => Some(DEFAULT_PROVIDER),
            ConfigKey::OpenAiModel => Some(DEFAULT_OPENAI_MODEL),
            ConfigKey::BedrockModel => Some(DEFAULT_BEDROCK_MODEL),
            ConfigKey::AwsRegion => Some(DEFAULT_AWS_REGION),
            ConfigKey::OpenAiApiKey | ConfigKey::BedrockApiKey => None,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::OpenAiApiKey | ConfigKey::BedrockApiKey)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Validate the format of an OpenAI API key.
pub fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    if API_KEY_PATTERN.is_match(key) {
        Ok(())
    } else {
        Err(ConfigError::InvalidApiKey)
    }
}

/// Mask a secret for display, keeping only the last four characters.
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => {
            let tail: String = s
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("*****{tail}")
        }
        _ => "Not configured".to_string(),
    }
}
