//! Map transport and backend failures onto the closed [`ProviderFailure`] taxonomy.
//!
//! Backends report errors in their own words. Credential and connectivity
//! problems are recognised by keyword and rewritten into a message that tells
//! the user how to fix them; everything else keeps the backend's text.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{ProviderError, ProviderFailure};
use crate::llm::Provider;

/// Longest backend detail carried into a user-facing message.
const MAX_DETAIL_CHARS: usize = 300;

const CREDENTIAL_KEYWORDS: &[&str] = &[
    "credentials",
    "unauthorized",
    "access denied",
    "accessdenied",
    "invalid api key",
    "incorrect api key",
    "invalid_api_key",
    "api key",
    "forbidden",
    "expired",
    "security token",
    "not authorized",
];

const NETWORK_KEYWORDS: &[&str] = &[
    "connection refused",
    "connection reset",
    "error sending request",
    "dns error",
    "failed to lookup address",
    "enotfound",
    "econnrefused",
    "network is unreachable",
    "tcp connect",
];

/// Classify a free-form error message.
pub fn classify_message(provider: Provider, message: &str) -> ProviderError {
    let lower = message.to_lowercase();

    if CREDENTIAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return credentials_error(provider, message);
    }

    if NETWORK_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return network_error(provider, message);
    }

    ProviderError::new(provider, ProviderFailure::Api, truncate_detail(message))
}

/// Classify a non-success HTTP response.
pub fn classify_status(provider: Provider, status: StatusCode, body: &str) -> ProviderError {
    let detail = error_detail(body);
    let message = format!("HTTP {}: {}", status.as_u16(), detail);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => credentials_error(provider, &message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::new(
            provider,
            ProviderFailure::RateLimited,
            format!(
                "{provider} is rate limiting requests. Wait a moment and try again. ({})",
                truncate_detail(&message)
            ),
        ),
        _ => classify_message(provider, &message),
    }
}

/// Classify an error raised by the HTTP client itself.
pub fn classify_transport(provider: Provider, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::new(
            provider,
            ProviderFailure::Timeout,
            format!("Request to {provider} timed out"),
        );
    }

    let message = error_chain(err);
    if err.is_connect() {
        return network_error(provider, &message);
    }

    classify_message(provider, &message)
}

fn credentials_error(provider: Provider, detail: &str) -> ProviderError {
    let remedy = match provider {
        Provider::OpenAi => {
            "Authentication with OpenAI failed. Check your API key with `gpush config --set-key <key>`."
        }
        Provider::Bedrock => {
            "Authentication with AWS Bedrock failed. Check your Bedrock API key \
             (`gpush config --set-bedrock-key <key>` or AWS_BEARER_TOKEN_BEDROCK) \
             and that the model is enabled in your AWS region."
        }
    };

    ProviderError::new(
        provider,
        ProviderFailure::Credentials,
        format!("{remedy} ({})", truncate_detail(detail)),
    )
}

fn network_error(provider: Provider, detail: &str) -> ProviderError {
    ProviderError::new(
        provider,
        ProviderFailure::Network,
        format!(
            "Could not reach {provider}. Check your network connection and proxy settings. ({})",
            truncate_detail(detail)
        ),
    )
}

/// Pull the human-readable message out of a JSON error body.
///
/// OpenAI nests it under `error.message`; Bedrock uses a top-level `message`
/// (sometimes `Message`). Falls back to the raw body.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let nested = value
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(Value::as_str);
        let top = value
            .get("message")
            .or_else(|| value.get("Message"))
            .and_then(Value::as_str);
        if let Some(msg) = nested.or(top) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render an error with its sources, since reqwest hides the root cause.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_DETAIL_CHARS {
        detail.to_string()
    } else {
        let cut: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{cut}...")
    }
}
