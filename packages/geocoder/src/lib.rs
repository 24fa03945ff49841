#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place-name geocoding for RiskLens.
//!
//! Turns a free-text search ("Springfield") into the single best
//! [`SearchResult`], which then becomes the analysis target. The provider is
//! configured via TOML files in `services/` (see [`service_registry`]);
//! currently only **Nominatim / `OpenStreetMap`** is shipped.
//!
//! Callers go through [`resolve`], which never fails loudly: transport
//! errors, timeouts, rate limiting, and empty result sets all collapse into
//! [`GeocodeNotFound`] after being logged. There is no retry; a user search
//! is exactly one outbound request.

pub mod nominatim;
pub mod service_registry;

use risk_lens_risk_models::SearchResult;
use thiserror::Error;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Geocoding request timed out")]
    Timeout,

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// No geocoding service is configured.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

impl GeocodeError {
    /// Converts a `reqwest` error, separating timeouts from other failures.
    #[must_use]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// The search matched nothing, or the lookup could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No results for \"{query}\"")]
pub struct GeocodeNotFound {
    /// The query as submitted (trimmed).
    pub query: String,
}

/// A geocoding backend returning at most one best match.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Searches for `query` and returns the best match, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup cannot be completed.
    async fn search(&self, query: &str) -> Result<Option<SearchResult>, GeocodeError>;
}

/// Resolves a place name to its best match.
///
/// Empty or whitespace-only queries return [`GeocodeNotFound`] without
/// contacting the service.
///
/// # Errors
///
/// Returns [`GeocodeNotFound`] if nothing matched or the lookup failed.
pub async fn resolve(geocoder: &dyn Geocoder, query: &str) -> Result<SearchResult, GeocodeNotFound> {
    let query = query.trim();
    let not_found = || GeocodeNotFound {
        query: query.to_string(),
    };

    if query.is_empty() {
        return Err(not_found());
    }

    match geocoder.search(query).await {
        Ok(Some(result)) => {
            log::debug!(
                "Geocoded \"{query}\" to {} ({}, {})",
                result.display_name,
                result.latitude,
                result.longitude
            );
            Ok(result)
        }
        Ok(None) => {
            log::info!("No geocoding results for \"{query}\"");
            Err(not_found())
        }
        Err(e) => {
            log::warn!("Geocoding \"{query}\" failed: {e}");
            Err(not_found())
        }
    }
}

/// Creates the default geocoder from the embedded service configuration.
///
/// `GEOCODER_BASE_URL`, when set, overrides the configured endpoint.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if no service is enabled, or
/// [`GeocodeError::Http`] if the HTTP client cannot be built.
pub fn create_geocoder_from_env() -> Result<Box<dyn Geocoder>, GeocodeError> {
    let service = service_registry::default_service().ok_or_else(|| GeocodeError::Config {
        message: "No enabled geocoding service".to_string(),
    })?;

    log::info!("Using geocoding service: {}", service.name);

    let mut geocoder = nominatim::NominatimGeocoder::from_service(&service)?;
    if let Ok(base_url) = std::env::var("GEOCODER_BASE_URL") {
        log::info!("Geocoder base URL overridden: {base_url}");
        geocoder = geocoder.with_base_url(base_url);
    }

    Ok(Box::new(geocoder))
}
