//! Anthropic Claude provider implementation.
//!
//! The Messages API has no response-schema parameter, so structured
//! requests carry the schema in the system prompt and ask for bare JSON.

use risk_lens_risk_models::{ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};

use super::{LlmProvider, ModelSelection, error_message};
use crate::AiError;

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    models: ModelSelection,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
    #[must_use]
    pub fn new(api_key: String, models: ModelSelection) -> Self {
        Self {
            api_key,
            models,
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, request: &AnthropicRequest<'_>) -> Result<String, AiError> {
        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(AiError::Provider {
                message: error_message(status, &body),
            });
        }

        let response: AnthropicResponse = serde_json::from_str(&body)?;

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

const fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "assistant",
    }
}

/// Builds the message list for a chat turn.
///
/// The Messages API requires the first message to come from the user,
/// while a session history starts with the assistant's greeting, so a
/// short user opener is inserted in that case.
fn chat_messages(history: &[ChatTurn], message: &str) -> Vec<AnthropicMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if history.first().is_some_and(|t| t.role == ChatRole::Model) {
        messages.push(AnthropicMessage {
            role: "user",
            content: "Hello.".to_string(),
        });
    }

    messages.extend(history.iter().map(|turn| AnthropicMessage {
        role: role_name(turn.role),
        content: turn.text.clone(),
    }));
    messages.push(AnthropicMessage {
        role: "user",
        content: message.to_string(),
    });

    messages
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError> {
        let system = format!(
            "Respond with a single JSON object and nothing else: no prose, no \
             markdown fences. The object must conform to this JSON Schema:\n{}",
            serde_json::to_string_pretty(schema)?
        );

        let request = AnthropicRequest {
            model: &self.models.analysis,
            max_tokens: 4096,
            system: &system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        self.send(&request).await
    }

    async fn chat(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError> {
        let request = AnthropicRequest {
            model: &self.models.chat,
            max_tokens: 4096,
            system: system_instruction,
            messages: chat_messages(history, message),
        };

        self.send(&request).await
    }
}
