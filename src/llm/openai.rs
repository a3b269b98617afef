//! Chat-completion provider (OpenAI API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GpushError, ProviderError, ProviderFailure};
use crate::llm::classify::{classify_status, classify_transport};
use crate::llm::prompt::SYSTEM_INSTRUCTION;
use crate::llm::{CommitMessageProvider, MAX_OUTPUT_TOKENS, Provider};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Sends the diff as the user turn of a chat completion.
pub struct ChatProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CommitMessageProvider for ChatProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate_commit_message(&self, diff: &str) -> Result<String, GpushError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: diff,
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        debug!(
            "POST {} (model={}, {} diff chars)",
            self.endpoint(),
            self.model,
            diff.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::OpenAi, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::OpenAi, status, &body).into());
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::new(
                Provider::OpenAi,
                ProviderFailure::Api,
                format!("Invalid response body: {e}"),
            )
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| GpushError::Generation("OpenAI returned an empty response".into()))
    }
}
