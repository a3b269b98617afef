//! Prompt-completion provider (AWS Bedrock InvokeModel, Anthropic message format).
//!
//! Authenticates with a Bedrock API key sent as a bearer token, so no request
//! signing is needed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GpushError, ProviderError, ProviderFailure};
use crate::llm::classify::{classify_status, classify_transport};
use crate::llm::prompt::build_prompt;
use crate::llm::{CommitMessageProvider, MAX_OUTPUT_TOKENS, Provider};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Bedrock runtime endpoint for a region.
pub fn regional_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    messages: [InvokeMessage<'a>; 1],
}

#[derive(Serialize)]
struct InvokeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Wraps the diff in a fixed instruction and invokes a single-turn completion.
pub struct PromptProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl PromptProvider {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn invoke_url(&self) -> String {
        // Inference profile ARNs contain '/', which must not split the path.
        let model = self.model.replace('/', "%2F");
        format!(
            "{}/model/{}/invoke",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl CommitMessageProvider for PromptProvider {
    fn provider(&self) -> Provider {
        Provider::Bedrock
    }

    async fn generate_commit_message(&self, diff: &str) -> Result<String, GpushError> {
        let prompt = build_prompt(diff);
        let request = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: [InvokeMessage {
                role: "user",
                content: &prompt,
            }],
        };

        debug!(
            "POST {} ({} prompt chars)",
            self.invoke_url(),
            prompt.len()
        );

        let response = self
            .http
            .post(self.invoke_url())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::Bedrock, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::Bedrock, status, &body).into());
        }

        let parsed: InvokeResponse = response.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Bedrock,
                ProviderFailure::Api,
                format!("Invalid response body: {e}"),
            )
        })?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                GpushError::Generation("Bedrock response did not contain any text".into())
            })
    }
}
