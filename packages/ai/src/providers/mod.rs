//! LLM provider abstraction and implementations.
//!
//! Supports Google Gemini, `OpenAI`, and Anthropic via a common trait. A
//! provider exposes the two call shapes the dashboard needs: a single-shot
//! request whose output is constrained to a JSON schema, and a chat turn
//! with role-tagged history, a system instruction, and a new message.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use risk_lens_risk_models::ChatTurn;

use crate::AiError;

/// Which model each call shape uses.
///
/// Analysis is a single structured request and runs on a fast model; chat
/// benefits from a stronger one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    /// Model for schema-constrained analysis requests.
    pub analysis: String,
    /// Model for conversational turns.
    pub chat: String,
}

impl ModelSelection {
    /// Uses the same model for both call shapes.
    #[must_use]
    pub fn single(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            analysis: model.clone(),
            chat: model,
        }
    }
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a single prompt and asks the model to answer with JSON
    /// conforming to `schema`. Returns the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError>;

    /// Sends `message` as the next user turn after `history`, with
    /// `system_instruction` governing the reply. Returns the reply text,
    /// which may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn chat(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError>;
}

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `GEMINI_API_KEY` or `API_KEY` set -> Google Gemini
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 3. `OPENAI_API_KEY` set -> `OpenAI` (or a compatible server at
///    `AI_BASE_URL`)
///
/// `AI_MODEL` overrides the analysis model and `AI_CHAT_MODEL` the chat
/// model; when only `AI_MODEL` is set it is used for both.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| detect_provider());

    match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .map_err(|_| AiError::Config {
                    message: "GEMINI_API_KEY environment variable not set".to_string(),
                })?;
            let models = models_from_env("gemini-3-flash-preview", "gemini-3.1-pro-preview");
            Ok(Box::new(gemini::GeminiProvider::new(api_key, models)))
        }
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let models = models_from_env("claude-sonnet-4-20250514", "claude-sonnet-4-20250514");
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, models)))
        }
        "openai" | "gpt" => {
            let base_url = std::env::var("AI_BASE_URL").ok();
            // Local OpenAI-compatible servers usually ignore the key.
            let api_key = match std::env::var("OPENAI_API_KEY") {
                Ok(key) => key,
                Err(_) if base_url.is_some() => String::new(),
                Err(_) => {
                    return Err(AiError::Config {
                        message: "OPENAI_API_KEY environment variable not set".to_string(),
                    });
                }
            };
            let models = models_from_env("gpt-4o-mini", "gpt-4o");
            let mut provider = openai::OpenAiProvider::new(api_key, models);
            if let Some(base_url) = base_url {
                log::info!("Using OpenAI-compatible endpoint at {base_url}");
                provider = provider.with_base_url(base_url);
            }
            Ok(Box::new(provider))
        }
        other => Err(AiError::Config {
            message: format!(
                "Unknown AI provider: {other}. Use 'gemini', 'openai', or 'anthropic'."
            ),
        }),
    }
}

/// Reads model overrides from `AI_MODEL` / `AI_CHAT_MODEL`.
fn models_from_env(default_analysis: &str, default_chat: &str) -> ModelSelection {
    let analysis = std::env::var("AI_MODEL").ok();
    let chat = std::env::var("AI_CHAT_MODEL").ok();

    match (analysis, chat) {
        (Some(analysis), Some(chat)) => ModelSelection { analysis, chat },
        (Some(model), None) => ModelSelection::single(model),
        (None, Some(chat)) => ModelSelection {
            analysis: default_analysis.to_string(),
            chat,
        },
        (None, None) => ModelSelection {
            analysis: default_analysis.to_string(),
            chat: default_chat.to_string(),
        },
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name string that matches the arms in
/// [`create_provider_from_env`].
fn detect_provider() -> String {
    if std::env::var("GEMINI_API_KEY").is_ok() || std::env::var("API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Gemini (GEMINI_API_KEY/API_KEY found)");
        return "gemini".to_string();
    }

    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    if std::env::var("OPENAI_API_KEY").is_ok() || std::env::var("AI_BASE_URL").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY/AI_BASE_URL found)");
        return "openai".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set one of: GEMINI_API_KEY, ANTHROPIC_API_KEY, \
         OPENAI_API_KEY, or AI_BASE_URL. You can also set AI_PROVIDER explicitly."
    );

    // Gemini then fails with a clear missing-key error.
    "gemini".to_string()
}

/// Extracts a provider error message from a JSON error body of the form
/// `{"error": {"message": "..."}}`, which Gemini, `OpenAI`, and Anthropic
/// all use.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("HTTP {status}: {body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_provider_detail() {
        let body = r#"{"error": {"message": "API key not valid", "code": 400}}"#;
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_REQUEST, body),
            "API key not valid"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        let msg = error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(msg, "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn single_model_selection_uses_one_model() {
        let models = ModelSelection::single("local-llm");
        assert_eq!(models.analysis, models.chat);
    }
}
