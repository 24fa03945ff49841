//! Shared handle to the reasoning service.

use std::sync::Arc;
use std::time::Duration;

use risk_lens_risk_models::{ChatTurn, LanguageCode};

use crate::AiError;
use crate::localization::{Localizer, StaticLocalizer, directive_language};
use crate::providers::{LlmProvider, create_provider_from_env};

/// Default client-side timeout for one remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A provider plus the settings every call shares: the timeout and the
/// lookup used to name the response language.
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct ReasoningClient {
    provider: Arc<dyn LlmProvider>,
    localizer: Arc<dyn Localizer>,
    timeout: Duration,
}

impl ReasoningClient {
    /// Wraps a provider with the default timeout and built-in language table.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            localizer: Arc::new(StaticLocalizer),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// See [`create_provider_from_env`] for provider selection.
    /// `AI_TIMEOUT_SECS` overrides [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Config`] if no provider can be configured.
    pub fn from_env() -> Result<Self, AiError> {
        let provider: Arc<dyn LlmProvider> = Arc::from(create_provider_from_env()?);
        let mut client = Self::new(provider);

        if let Some(secs) = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            client = client.with_timeout(Duration::from_secs(secs));
        }

        Ok(client)
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the language lookup table.
    #[must_use]
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// The per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name of `language` for a "respond in ..." directive.
    #[must_use]
    pub fn language_name(&self, language: LanguageCode) -> String {
        directive_language(self.localizer.as_ref(), language)
    }

    /// Schema-constrained single-shot request, bounded by the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Timeout`] on expiry, or the provider's error.
    pub async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError> {
        self.bounded(self.provider.generate_structured(prompt, schema))
            .await
    }

    /// Chat turn, bounded by the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Timeout`] on expiry, or the provider's error.
    pub async fn chat(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError> {
        self.bounded(self.provider.chat(system_instruction, history, message))
            .await
    }

    async fn bounded<F>(&self, call: F) -> Result<String, AiError>
    where
        F: Future<Output = Result<String, AiError>> + Send,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AiError::Timeout {
                seconds: self.timeout.as_secs(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowProvider;

    #[async_trait::async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate_structured(
            &self,
            _prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("{}".to_string())
        }

        async fn chat(
            &self,
            _system_instruction: &str,
            _history: &[ChatTurn],
            _message: &str,
        ) -> Result<String, AiError> {
            Ok("hi".to_string())
        }
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let client =
            ReasoningClient::new(Arc::new(SlowProvider)).with_timeout(Duration::from_millis(50));
        let err = client
            .generate_structured("prompt", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let client = ReasoningClient::new(Arc::new(SlowProvider));
        assert_eq!(client.chat("sys", &[], "hello").await.unwrap(), "hi");
    }

    #[test]
    fn language_name_uses_lookup_table() {
        let client = ReasoningClient::new(Arc::new(SlowProvider));
        assert_eq!(client.language_name(LanguageCode::Hi), "Hindi");
    }
}
