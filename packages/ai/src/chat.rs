//! Assistant conversations scoped to one analysis context.
//!
//! A [`ConversationSession`] holds the ordered turns for one location and
//! language. The system instruction is rebuilt from the session's current
//! [`PredictionData`] on every call and re-sent in full; sessions live only
//! as long as the dashboard keeps them, so the history stays short.
//!
//! Remote failures never break a session: a failed greeting becomes
//! [`FALLBACK_GREETING`] and a failed turn becomes [`TURN_FAILURE_REPLY`].

use std::sync::Arc;

use risk_lens_risk_models::{ChatTurn, LanguageCode, PredictionData};
use thiserror::Error;

use crate::client::ReasoningClient;

/// Message sent on the user's behalf to obtain the opening greeting.
pub const GREETING_REQUEST: &str =
    "Hello, please introduce yourself briefly and ask how you can help with construction in this area.";

/// Greeting used when the opening call fails.
pub const FALLBACK_GREETING: &str =
    "Hello! I am your RiskLens assistant. How can I help you today?";

/// Reply recorded when a turn's remote call fails.
pub const TURN_FAILURE_REPLY: &str = "Error connecting to assistant.";

/// Reply recorded when the service answers with no text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that.";

/// Label used when no analysis target has been selected.
pub const NO_TARGET_LABEL: &str = "Current View";

/// Rejected input; the session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatInputError {
    /// The message was empty after trimming.
    #[error("Message is empty")]
    EmptyMessage,
}

/// Builds the system instruction for one call.
///
/// Absent analysis fields render as `Unknown` / `N/A`, and the assistant is
/// told to ask for a location when there is no analysis at all.
#[must_use]
pub fn build_system_instruction(
    location_label: &str,
    analysis: Option<&PredictionData>,
    language_name: &str,
) -> String {
    let risk_level = analysis.map_or_else(|| "Unknown".to_string(), |a| a.risk_level.to_string());
    let score = analysis.map_or_else(|| "N/A".to_string(), |a| a.score.to_string());
    let metric = |f: fn(&PredictionData) -> &str| analysis.map_or("Unknown", f);
    let reasoning = analysis.map_or("No initial reasoning provided.", |a| a.reasoning.as_str());
    let recommendation = analysis.map_or("No initial recommendation provided.", |a| {
        a.recommendation.as_str()
    });

    format!(
        r"You are RiskLens, a geospatial and construction engineering assistant. You give data-driven guidance for construction projects based on a prior site analysis.

CURRENT LOCATION CONTEXT:
- Location Name: {location_label}
- Risk Level: {risk_level}
- Safety Score: {score}/100
- Flood Risk: {flood}
- Construction Feasibility: {feasibility}
- Terrain/Elevation: {elevation}
- Land Use: {land_use}

INITIAL ANALYSIS SUMMARY:
- Reasoning: {reasoning}
- Recommendation: {recommendation}

OPERATING GUIDELINES:
1. LANGUAGE: Respond only in {language_name}.
2. REGISTER: Use terminology appropriate for civil engineers and urban planners; explain concepts simply when asked.
3. CONTEXT: Follow the conversation history. When the user asks why, or asks for more detail, ground the answer in the metrics and reasoning above.
4. FOLLOW-UP: Invite questions about specific risks, mitigation strategies, or regulatory compliance.
5. NO CONTEXT: If no location has been analyzed yet (risk level Unknown), ask the user to select a point on the map or search for a place first.

Be professional and precise.",
        flood = metric(|a| a.metrics.flood_risk.as_str()),
        feasibility = metric(|a| a.metrics.construction_feasibility.as_str()),
        elevation = metric(|a| a.metrics.elevation_profile.as_str()),
        land_use = metric(|a| a.metrics.land_use_type.as_str()),
    )
}

/// Ordered assistant conversation for one location, analysis, and language.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    location_label: String,
    analysis: Option<Arc<PredictionData>>,
    language: LanguageCode,
    turns: Vec<ChatTurn>,
}

impl ConversationSession {
    /// Opens a session and records the assistant's greeting as the first
    /// turn.
    ///
    /// Makes one remote call; on failure or an empty reply the greeting is
    /// [`FALLBACK_GREETING`].
    pub async fn open(
        client: &ReasoningClient,
        location_label: impl Into<String>,
        analysis: Option<Arc<PredictionData>>,
        language: LanguageCode,
    ) -> Self {
        let mut session = Self {
            location_label: location_label.into(),
            analysis,
            language,
            turns: Vec::new(),
        };

        let greeting = match client
            .chat(&session.system_instruction(client), &[], GREETING_REQUEST)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::warn!("Assistant greeting was empty; using fallback");
                FALLBACK_GREETING.to_string()
            }
            Err(e) => {
                log::warn!("Assistant greeting failed: {e}");
                FALLBACK_GREETING.to_string()
            }
        };

        session.turns.push(ChatTurn::model(greeting));
        session
    }

    /// Sends a user message and records the reply.
    ///
    /// Appends exactly two turns (the user's and the model's) on every
    /// accepted message, even when the remote call fails. The remote call
    /// receives every earlier turn as history and `user_text` as the new
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatInputError::EmptyMessage`] without touching the session
    /// if `user_text` is blank.
    pub async fn send(
        &mut self,
        client: &ReasoningClient,
        user_text: &str,
    ) -> Result<&ChatTurn, ChatInputError> {
        if user_text.trim().is_empty() {
            return Err(ChatInputError::EmptyMessage);
        }

        self.turns.push(ChatTurn::user(user_text));

        let (history, newest) = self.turns.split_at(self.turns.len() - 1);
        let reply = match client
            .chat(&self.system_instruction(client), history, &newest[0].text)
            .await
        {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                log::warn!("Assistant turn failed: {e}");
                TURN_FAILURE_REPLY.to_string()
            }
        };

        self.turns.push(ChatTurn::model(reply));
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Replaces the analysis context, e.g. when the result for this
    /// session's location arrives after the session was opened.
    pub fn set_analysis(&mut self, analysis: Option<Arc<PredictionData>>) {
        self.analysis = analysis;
    }

    /// System instruction for the next call.
    #[must_use]
    pub fn system_instruction(&self, client: &ReasoningClient) -> String {
        build_system_instruction(
            &self.location_label,
            self.analysis.as_deref(),
            &client.language_name(self.language),
        )
    }

    /// Whether this session was opened for `location_label` in `language`.
    #[must_use]
    pub fn is_for(&self, location_label: &str, language: LanguageCode) -> bool {
        self.location_label == location_label && self.language == language
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Location the session was opened for.
    #[must_use]
    pub fn location_label(&self) -> &str {
        &self.location_label
    }

    /// Current analysis context.
    #[must_use]
    pub fn analysis(&self) -> Option<&Arc<PredictionData>> {
        self.analysis.as_ref()
    }

    /// Response language.
    #[must_use]
    pub const fn language(&self) -> LanguageCode {
        self.language
    }
}
