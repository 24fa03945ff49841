#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core data types shared across the RiskLens workspace.
//!
//! Defines the analysis target types ([`Coordinate`], [`SearchResult`]), the
//! structured site assessment returned by the reasoning service
//! ([`PredictionData`]), conversation turns ([`ChatTurn`]), the supported
//! display languages ([`LanguageCode`]), and transient alert notices
//! ([`AlertNotice`]).
//!
//! Field names on the serialized forms match the JSON schema the reasoning
//! service is asked to produce, so [`PredictionData`] can be deserialized
//! directly from the model output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate pair produced by a map click, the device, or the
/// geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite real numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A resolved place: the geocoder's best match or a labelled map click.
///
/// Once produced it becomes the active analysis target and is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human-readable place name.
    pub display_name: String,
}

impl SearchResult {
    /// Creates a search result for a raw map click, labelled with the
    /// coordinate rounded to four decimals (e.g. `Point [39.7800, -89.6500]`).
    #[must_use]
    pub fn from_point(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            display_name: format!(
                "Point [{:.4}, {:.4}]",
                coordinate.latitude, coordinate.longitude
            ),
        }
    }

    /// Returns the coordinate of this result.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Overall risk classification of an analyzed site.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Little to no hazard for construction.
    Low,
    /// Manageable hazards with standard mitigation.
    Medium,
    /// Significant hazards requiring engineering review.
    High,
    /// Construction strongly discouraged.
    Critical,
}

impl RiskLevel {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Per-dimension findings for an analyzed site. All free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetrics {
    /// Flood exposure assessment.
    pub flood_risk: String,
    /// Suitability of the site for construction.
    pub construction_feasibility: String,
    /// Elevation and terrain description.
    pub elevation_profile: String,
    /// Predominant land use.
    pub land_use_type: String,
}

/// The structured analysis result for one target.
///
/// Every field is required. Deserialization fails on any missing or
/// mistyped field; there are no defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionData {
    /// Overall risk classification.
    pub risk_level: RiskLevel,
    /// Safety score, nominally 0-100. Not clamped.
    pub score: f64,
    /// Explanation of the assessment.
    pub reasoning: String,
    /// Recommended course of action.
    pub recommendation: String,
    /// Per-dimension findings.
    pub metrics: SiteMetrics,
}

/// Who authored a chat turn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// The person using the dashboard.
    User,
    /// The remote assistant.
    Model,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Originator of the message.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
}

impl ChatTurn {
    /// Creates a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Creates a model turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Display languages the dashboard and the assistant can use.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LanguageCode {
    /// English
    #[default]
    En,
    /// Hindi
    Hi,
    /// Marathi
    Mr,
    /// Bengali
    Bn,
    /// Telugu
    Te,
    /// Tamil
    Ta,
    /// Gujarati
    Gu,
    /// Kannada
    Kn,
    /// Malayalam
    Ml,
    /// Punjabi
    Pa,
    /// Maithili
    Mai,
}

/// Labels for one supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Language code.
    pub code: LanguageCode,
    /// English name, used when instructing the reasoning service.
    pub label: &'static str,
    /// Name in the language itself.
    pub native: &'static str,
}

/// All supported languages, in menu order.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        code: LanguageCode::En,
        label: "English",
        native: "English",
    },
    Language {
        code: LanguageCode::Hi,
        label: "Hindi",
        native: "हिन्दी",
    },
    Language {
        code: LanguageCode::Mr,
        label: "Marathi",
        native: "मराठी",
    },
    Language {
        code: LanguageCode::Bn,
        label: "Bengali",
        native: "বাংলা",
    },
    Language {
        code: LanguageCode::Te,
        label: "Telugu",
        native: "తెలుగు",
    },
    Language {
        code: LanguageCode::Ta,
        label: "Tamil",
        native: "தமிழ்",
    },
    Language {
        code: LanguageCode::Gu,
        label: "Gujarati",
        native: "ગુજરાતી",
    },
    Language {
        code: LanguageCode::Kn,
        label: "Kannada",
        native: "ಕನ್ನಡ",
    },
    Language {
        code: LanguageCode::Ml,
        label: "Malayalam",
        native: "മലയാളം",
    },
    Language {
        code: LanguageCode::Pa,
        label: "Punjabi",
        native: "ਪੰਜਾਬੀ",
    },
    Language {
        code: LanguageCode::Mai,
        label: "Maithili/Bihari",
        native: "मैथिली",
    },
];

impl LanguageCode {
    /// Returns the label entry for this language.
    #[must_use]
    pub fn language(self) -> &'static Language {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|l| l.code == self)
            .unwrap_or(&SUPPORTED_LANGUAGES[0])
    }

    /// English name of the language (e.g. `"Tamil"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        self.language().label
    }

    /// Parses a language code, falling back to English for unknown codes.
    #[must_use]
    pub fn parse_or_default(code: &str) -> Self {
        code.trim().parse().unwrap_or_default()
    }
}

/// What an alert is about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    /// Flood warnings.
    Flood,
    /// Construction-related notices.
    Construction,
    /// Application status and failures.
    System,
}

/// How prominently an alert should be shown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Something failed.
    Error,
}

/// A transient notification shown in the alert overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotice {
    /// Unique identifier, used for dismissal.
    pub id: String,
    /// What the alert is about.
    pub category: AlertCategory,
    /// Message shown to the user.
    pub message: String,
    /// When the alert was raised.
    pub created_at: DateTime<Utc>,
    /// Display severity.
    pub severity: AlertSeverity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "riskLevel": "HIGH",
            "score": 28,
            "reasoning": "Low-lying floodplain adjacent to the river.",
            "recommendation": "Raise foundations above the 100-year flood line.",
            "metrics": {
                "floodRisk": "High",
                "constructionFeasibility": "Restricted",
                "elevationProfile": "Flat, 4 m above river level",
                "landUseType": "Agricultural"
            }
        })
    }

    #[test]
    fn prediction_deserializes_from_schema_field_names() {
        let data: PredictionData = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(data.risk_level, RiskLevel::High);
        assert!((data.score - 28.0).abs() < f64::EPSILON);
        assert_eq!(data.metrics.land_use_type, "Agricultural");
    }

    #[test]
    fn prediction_rejects_missing_metric() {
        let mut json = sample_json();
        json["metrics"]
            .as_object_mut()
            .unwrap()
            .remove("elevationProfile");
        assert!(serde_json::from_value::<PredictionData>(json).is_err());
    }

    #[test]
    fn prediction_rejects_unknown_risk_level() {
        let mut json = sample_json();
        json["riskLevel"] = serde_json::json!("SEVERE");
        assert!(serde_json::from_value::<PredictionData>(json).is_err());
    }

    #[test]
    fn prediction_rejects_empty_object() {
        assert!(serde_json::from_str::<PredictionData>("{}").is_err());
    }

    #[test]
    fn risk_level_strings_match_schema_enum() {
        let names: Vec<String> = RiskLevel::all().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["LOW", "MEDIUM", "HIGH", "CRITICAL"]);
    }

    #[test]
    fn every_language_code_has_a_label() {
        for lang in SUPPORTED_LANGUAGES {
            assert_eq!(lang.code.language().code, lang.code);
            assert!(!lang.label.is_empty());
        }
        assert_eq!(LanguageCode::Mai.label(), "Maithili/Bihari");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(LanguageCode::parse_or_default("xx"), LanguageCode::En);
        assert_eq!(LanguageCode::parse_or_default("TA"), LanguageCode::Ta);
    }

    #[test]
    fn point_label_uses_four_decimals() {
        let result = SearchResult::from_point(Coordinate::new(39.78, -89.65));
        assert_eq!(result.display_name, "Point [39.7800, -89.6500]");
        assert_eq!(result.coordinate(), Coordinate::new(39.78, -89.65));
    }
}
