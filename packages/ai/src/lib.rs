#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reasoning-service access for RiskLens.
//!
//! All site assessments and assistant replies come from a remote LLM.
//! This crate wraps that dependency behind the [`providers::LlmProvider`]
//! trait (Google Gemini, `OpenAI`, and Anthropic Claude are supported, plus
//! any `OpenAI`-compatible server via `AI_BASE_URL`) and builds the two
//! request shapes the dashboard needs:
//!
//! - [`analysis::analyze`] asks for a schema-constrained JSON assessment of
//!   one coordinate and deserializes it strictly into a
//!   [`PredictionData`](risk_lens_risk_models::PredictionData).
//! - [`chat::ConversationSession`] keeps the turn history for one analysis
//!   context and sends each new message with a system instruction rebuilt
//!   from the latest assessment.
//!
//! Every remote call goes through [`client::ReasoningClient`], which applies
//! the client-side timeout.

pub mod analysis;
pub mod chat;
pub mod client;
pub mod localization;
pub mod providers;

use thiserror::Error;

/// Errors that can occur while talking to the reasoning service.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// The call did not complete within the client-side timeout.
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout.
        seconds: u64,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
