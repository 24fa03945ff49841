//! Site analysis requests.
//!
//! Builds the instruction for one coordinate, asks the reasoning service for
//! JSON constrained to [`prediction_schema`], and deserializes the reply
//! strictly into [`PredictionData`]. Exactly one remote call per
//! [`analyze`]; retrying is the caller's decision.

use risk_lens_risk_models::{Coordinate, LanguageCode, PredictionData, RiskLevel};
use thiserror::Error;

use crate::AiError;
use crate::client::ReasoningClient;

/// Why an analysis produced no result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The remote call failed or timed out.
    #[error("Analysis request failed: {0}")]
    Remote(#[from] AiError),

    /// The reply was empty, not JSON, or missing/mistyping a required field.
    #[error("Analysis response did not match the schema: {0}")]
    Schema(#[source] serde_json::Error),

    /// The coordinate has a NaN or infinite component.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(Coordinate),
}

/// JSON Schema the reasoning service must answer with.
///
/// Property names and enum values match [`PredictionData`]'s serialized
/// form. Every property is required and no extras are allowed.
#[must_use]
pub fn prediction_schema() -> serde_json::Value {
    let risk_levels: Vec<String> = RiskLevel::all().iter().map(ToString::to_string).collect();

    serde_json::json!({
        "type": "object",
        "properties": {
            "riskLevel": { "type": "string", "enum": risk_levels },
            "score": { "type": "number" },
            "reasoning": { "type": "string" },
            "recommendation": { "type": "string" },
            "metrics": {
                "type": "object",
                "properties": {
                    "floodRisk": { "type": "string" },
                    "constructionFeasibility": { "type": "string" },
                    "elevationProfile": { "type": "string" },
                    "landUseType": { "type": "string" }
                },
                "required": [
                    "floodRisk",
                    "constructionFeasibility",
                    "elevationProfile",
                    "landUseType"
                ],
                "additionalProperties": false
            }
        },
        "required": ["riskLevel", "score", "reasoning", "recommendation", "metrics"],
        "additionalProperties": false
    })
}

/// Builds the analysis instruction for one target.
#[must_use]
pub fn build_analysis_prompt(coordinate: Coordinate, label: &str, language_name: &str) -> String {
    format!(
        "Analyze geospatial safety for {label} at coordinates {lat}, {lon}.\n\
         Assess Flood Risk, Construction Suitability, Elevation/Terrain, and Land Use.\n\
         Give an overall risk level and a safety score from 0 (unsafe) to 100 (safe).\n\
         Provide the response in {language_name}.",
        lat = coordinate.latitude,
        lon = coordinate.longitude,
    )
}

/// Parses the service's reply into a complete [`PredictionData`].
///
/// An empty reply is treated as `{}`, which fails on the first required
/// field. A single surrounding markdown code fence is tolerated.
///
/// # Errors
///
/// Returns [`AnalysisError::Schema`] if any required field is missing or
/// mistyped.
pub fn parse_prediction(text: &str) -> Result<PredictionData, AnalysisError> {
    let body = strip_code_fence(text.trim());
    let body = if body.is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(AnalysisError::Schema)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Requests a site assessment for `coordinate`.
///
/// # Errors
///
/// Returns [`AnalysisError`] if the coordinate is not finite, the remote
/// call fails, or the reply does not deserialize into a complete
/// [`PredictionData`].
pub async fn analyze(
    client: &ReasoningClient,
    coordinate: Coordinate,
    label: &str,
    language: LanguageCode,
) -> Result<PredictionData, AnalysisError> {
    if !coordinate.is_finite() {
        return Err(AnalysisError::InvalidCoordinate(coordinate));
    }

    let prompt = build_analysis_prompt(coordinate, label, &client.language_name(language));
    log::debug!("Requesting analysis for {label} ({coordinate}) in {language}");

    let text = client
        .generate_structured(&prompt, &prediction_schema())
        .await?;

    let prediction = parse_prediction(&text)?;
    log::info!(
        "Analysis for {label}: {} (score {})",
        prediction.risk_level,
        prediction.score
    );
    Ok(prediction)
}
