//! LLM provider abstraction and selection.
//!
//! Each backend implements [`CommitMessageProvider`]. The concrete adapter is
//! chosen once per invocation by [`build_provider`] from the stored provider
//! identifier.

pub mod bedrock;
pub mod classify;
pub mod extract;
pub mod openai;
pub mod prompt;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{Config, env};
use crate::error::{ConfigError, GpushError, ProviderError, ProviderFailure};

pub use bedrock::PromptProvider;
pub use extract::extract_commit_message;
pub use openai::ChatProvider;

/// Upper bound on tokens requested for a commit message.
pub const MAX_OUTPUT_TOKENS: u32 = 200;

/// Connection establishment timeout for provider HTTP clients.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Bedrock,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Bedrock];

    /// Identifier stored in the configuration.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Bedrock => "bedrock",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Bedrock => "AWS Bedrock",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "bedrock" => Ok(Provider::Bedrock),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// A backend that turns a diff into a commit message draft.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitMessageProvider: Send + Sync {
    /// Which backend this is.
    fn provider(&self) -> Provider;

    /// Ask the backend for a commit message. Returns the raw response text.
    async fn generate_commit_message(&self, diff: &str) -> Result<String, GpushError>;
}

/// Build the provider selected in the configuration.
///
/// Fails with a configuration error for an unrecognized provider or a missing
/// credential. No network call is made here.
pub fn build_provider(config: &Config) -> Result<Box<dyn CommitMessageProvider>, GpushError> {
    let provider = config.provider()?;
    let model = config.model_for(provider);
    debug!("Selected provider {} with model {}", provider.id(), model);

    let http = http_client(provider)?;

    let built: Box<dyn CommitMessageProvider> = match provider {
        Provider::OpenAi => {
            let api_key = config.openai_api_key()?;
            let base_url = env::non_empty(env::OPENAI_BASE_URL_ENV_VAR)
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string());
            Box::new(ChatProvider::new(http, base_url, api_key, model))
        }
        Provider::Bedrock => {
            let api_key = config.bedrock_api_key()?;
            let endpoint = env::non_empty(env::BEDROCK_ENDPOINT_ENV_VAR)
                .unwrap_or_else(|| bedrock::regional_endpoint(&config.aws_region()));
            Box::new(PromptProvider::new(http, endpoint, api_key, model))
        }
    };

    Ok(built)
}

fn http_client(provider: Provider) -> Result<reqwest::Client, GpushError> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("gpush/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| client_setup_error(provider, &e.to_string()))
}

fn client_setup_error(provider: Provider, detail: &str) -> GpushError {
    ProviderError::new(
        provider,
        ProviderFailure::Api,
        format!("Failed to initialize HTTP client: {detail}"),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;

    #[test]
    fn test_provider_parse() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Bedrock".parse::<Provider>().unwrap(), Provider::Bedrock);
        assert!("gemini".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_ids_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(provider.id().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_build_provider_routes_openai_to_chat_adapter() {
        let mut config = Config::in_memory();
        config.set(ConfigKey::Provider, "openai").unwrap();
        config
            .set(ConfigKey::OpenAiApiKey, "sk-abcdefghijklmnopqrstuvwxyz")
            .unwrap();

        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.provider(), Provider::OpenAi);
    }

    #[test]
    fn test_build_provider_routes_bedrock_to_prompt_adapter() {
        let mut config = Config::in_memory();
        config.set(ConfigKey::Provider, "bedrock").unwrap();
        config.set(ConfigKey::BedrockApiKey, "bedrock-key").unwrap();

        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.provider(), Provider::Bedrock);
    }

    #[test]
    fn test_build_provider_rejects_unknown_provider() {
        let mut config = Config::in_memory();
        config.set(ConfigKey::Provider, "ollama").unwrap();

        let err = build_provider(&config).err().unwrap();
        assert!(matches!(
            err,
            GpushError::Configuration(ConfigError::UnknownProvider(_))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_client_setup_failure_is_a_provider_error() {
        let err = client_setup_error(Provider::Bedrock, "no TLS backend");
        assert!(matches!(
            &err,
            GpushError::Provider(ProviderError {
                provider: Provider::Bedrock,
                kind: ProviderFailure::Api,
                ..
            })
        ));
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("no TLS backend"));
    }

    #[test]
    fn test_build_provider_requires_openai_key() {
        let config = Config::in_memory();
        let err = build_provider(&config).err().unwrap();
        assert!(matches!(
            err,
            GpushError::Configuration(ConfigError::MissingCredential { .. })
        ));
    }
}
