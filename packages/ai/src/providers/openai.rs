//! `OpenAI` GPT provider implementation.
//!
//! Also works against `OpenAI`-compatible servers (Ollama, vLLM, llama.cpp,
//! LM Studio) via [`OpenAiProvider::with_base_url`]. Structured requests use
//! `response_format: json_schema` in strict mode.

use risk_lens_risk_models::{ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};

use super::{LlmProvider, ModelSelection, error_message};
use crate::AiError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` API provider.
pub struct OpenAiProvider {
    api_key: String,
    models: ModelSelection,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new `OpenAI` provider.
    #[must_use]
    pub fn new(api_key: String, models: ModelSelection) -> Self {
        Self {
            api_key,
            models,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Points the provider at an `OpenAI`-compatible server
    /// (e.g. `http://localhost:11434/v1`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn complete(&self, request: &OpenAiRequest<'_>) -> Result<String, AiError> {
        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .json(request);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = builder.send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(AiError::Provider {
                message: error_message(status, &body),
            });
        }

        let response: OpenAiResponse = serde_json::from_str(&body)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Provider {
                message: "No choices in OpenAI response".to_string(),
            })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

const fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "assistant",
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError> {
        let request = OpenAiRequest {
            model: &self.models.analysis,
            messages: vec![OpenAiMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "site_analysis",
                    strict: true,
                    schema: schema.clone(),
                },
            }),
            max_tokens: 4096,
        };

        self.complete(&request).await
    }

    async fn chat(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(OpenAiMessage {
            role: "system",
            content: system_instruction.to_string(),
        });
        messages.extend(history.iter().map(|turn| OpenAiMessage {
            role: role_name(turn.role),
            content: turn.text.clone(),
        }));
        messages.push(OpenAiMessage {
            role: "user",
            content: message.to_string(),
        });

        let request = OpenAiRequest {
            model: &self.models.chat,
            messages,
            response_format: None,
            max_tokens: 4096,
        };

        self.complete(&request).await
    }
}
