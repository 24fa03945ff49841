//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` REST endpoint. Structured requests pass the
//! schema as `responseSchema` with `responseMimeType: application/json`, so
//! the model's output is constrained server-side.

use risk_lens_risk_models::{ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};

use super::{LlmProvider, ModelSelection, error_message};
use crate::AiError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    models: ModelSelection,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    #[must_use]
    pub fn new(api_key: String, models: ModelSelection) -> Self {
        Self {
            api_key,
            models,
            client: reqwest::Client::new(),
        }
    }

    async fn generate(&self, model: &str, request: &GeminiRequest<'_>) -> Result<String, AiError> {
        let resp = self
            .client
            .post(format!("{BASE_URL}/{model}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
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

        let response: GeminiResponse = serde_json::from_str(&body)?;
        Ok(response.text())
    }
}

/// Gemini API request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: serde_json::Value,
}

/// Gemini API response body.
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, empty if there is none.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(String::from),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

const fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

/// Converts a JSON Schema fragment into Gemini's `Schema` dialect.
///
/// Gemini spells types in upper case (`"OBJECT"`, `"STRING"`) and rejects
/// `additionalProperties`.
fn to_gemini_schema(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "additionalProperties")
            .map(|(key, value)| {
                let converted = match (key.as_str(), value) {
                    ("type", serde_json::Value::String(t)) => {
                        serde_json::Value::String(t.to_uppercase())
                    }
                    ("enum" | "required", other) => other.clone(),
                    (_, other) => to_gemini_schema(other),
                };
                (key.clone(), converted)
            })
            .collect::<serde_json::Map<_, _>>()
            .into(),
        other => other.clone(),
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError> {
        let request = GeminiRequest {
            contents: vec![text_content(Some("user"), prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: to_gemini_schema(schema),
            }),
        };

        self.generate(&self.models.analysis, &request).await
    }

    async fn chat(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError> {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|turn| text_content(Some(role_name(turn.role)), &turn.text))
            .collect();
        contents.push(text_content(Some("user"), message));

        let request = GeminiRequest {
            contents,
            system_instruction: Some(text_content(None, system_instruction)),
            generation_config: None,
        };

        self.generate(&self.models.chat, &request).await
    }
}
