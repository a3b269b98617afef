//! One provider round-trip: truncate, generate, extract.

use std::time::Duration;

use tracing::debug;

use crate::commit::truncate::truncate_diff;
use crate::error::{GpushError, ProviderError, ProviderFailure};
use crate::llm::{CommitMessageProvider, extract_commit_message};

/// Produce a commit message for `diff`.
///
/// The diff is truncated to `max_chars` right before the call, the call is
/// bounded by `timeout`, and the response is reduced to the message itself.
/// An empty extracted message is a [`GpushError::Generation`].
pub async fn generate_commit_message(
    provider: &dyn CommitMessageProvider,
    diff: &str,
    max_chars: usize,
    timeout: Duration,
) -> Result<String, GpushError> {
    let truncated = truncate_diff(diff, max_chars)?;
    let backend = provider.provider();

    debug!(
        "Requesting commit message from {} ({} chars, timeout {:?})",
        backend,
        truncated.chars().count(),
        timeout
    );

    let raw = tokio::time::timeout(timeout, provider.generate_commit_message(&truncated))
        .await
        .map_err(|_| {
            ProviderError::new(
                backend,
                ProviderFailure::Timeout,
                format!(
                    "No response from {} within {}s. Set GPUSH_TIMEOUT to allow more time.",
                    backend,
                    timeout.as_secs()
                ),
            )
        })??;

    let message = extract_commit_message(&raw);
    if message.is_empty() {
        return Err(GpushError::Generation(
            "Generated commit message is empty".into(),
        ));
    }

    debug!("Extracted commit message ({} chars)", message.len());
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::TRUNCATION_MARKER;
    use crate::llm::{MockCommitMessageProvider, Provider};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn mock_returning(response: &'static str) -> MockCommitMessageProvider {
        let mut mock = MockCommitMessageProvider::new();
        mock.expect_provider().return_const(Provider::OpenAi);
        mock.expect_generate_commit_message()
            .times(1)
            .returning(move |_| Ok(response.to_string()));
        mock
    }

    #[tokio::test]
    async fn test_fenced_response_is_extracted() {
        let mock = mock_returning("```\nfeat: add hello marker\n```\nThis adds a greeting.");
        let message = generate_commit_message(&mock, "+hello\n", 4000, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(message, "feat: add hello marker");
    }

    #[tokio::test]
    async fn test_provider_sees_truncated_diff() {
        let diff = "x".repeat(50);
        let expected = format!("{}{}", "x".repeat(10), TRUNCATION_MARKER);

        let mut mock = MockCommitMessageProvider::new();
        mock.expect_provider().return_const(Provider::Bedrock);
        mock.expect_generate_commit_message()
            .withf(move |d| d == expected)
            .times(1)
            .returning(|_| Ok("fix: trim".to_string()));

        let message = generate_commit_message(&mock, &diff, 10, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(message, "fix: trim");
    }

    #[tokio::test]
    async fn test_blank_response_is_generation_error() {
        let mock = mock_returning("   \n\n  ");
        let err = generate_commit_message(&mock, "+x", 4000, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, GpushError::Generation(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_empty_diff_never_reaches_provider() {
        let mut mock = MockCommitMessageProvider::new();
        mock.expect_provider().return_const(Provider::OpenAi);
        mock.expect_generate_commit_message().never();

        let err = generate_commit_message(&mock, "", 4000, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, GpushError::InvalidDiff));
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated() {
        let mut mock = MockCommitMessageProvider::new();
        mock.expect_provider().return_const(Provider::OpenAi);
        mock.expect_generate_commit_message().returning(|_| {
            Err(ProviderError::new(Provider::OpenAi, ProviderFailure::Api, "HTTP 500").into())
        });

        let err = generate_commit_message(&mock, "+x", 4000, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    struct SlowProvider;

    #[async_trait::async_trait]
    impl CommitMessageProvider for SlowProvider {
        fn provider(&self) -> Provider {
            Provider::Bedrock
        }

        async fn generate_commit_message(&self, _diff: &str) -> Result<String, GpushError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("never".into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresponsive_provider_times_out() {
        let err = generate_commit_message(&SlowProvider, "+x", 4000, Duration::from_secs(60))
            .await
            .unwrap_err();
        match err {
            GpushError::Provider(e) => {
                assert_eq!(e.kind, ProviderFailure::Timeout);
                assert_eq!(e.provider, Provider::Bedrock);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
