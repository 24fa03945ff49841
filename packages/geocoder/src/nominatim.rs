//! Nominatim / OpenStreetMap geocoder client.
//!
//! Resolves free-form place names ("Springfield", "Pune railway station")
//! to the single best match. The public instance allows at most
//! **1 request per second** and requires an identifying `User-Agent`;
//! searches are user-initiated so no client-side throttling is applied.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use risk_lens_risk_models::SearchResult;

use crate::service_registry::{GeocodingService, ProviderConfig};
use crate::{GeocodeError, Geocoder};

/// Nominatim free-form search client.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl NominatimGeocoder {
    /// Creates a client from a service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_service(service: &GeocodingService) -> Result<Self, GeocodeError> {
        let ProviderConfig::Nominatim {
            base_url,
            user_agent,
            timeout_secs,
            limit,
        } = &service.provider;

        let client = reqwest::Client::builder()
            .user_agent(user_agent.as_str())
            .timeout(Duration::from_secs(*timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
            limit: *limit,
        })
    }

    /// Overrides the search endpoint (e.g., a self-hosted instance).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<SearchResult>, GeocodeError> {
        geocode_freeform(&self.client, &self.base_url, query, self.limit).await
    }
}

/// Geocodes a free-form query using Nominatim.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    limit: u32,
) -> Result<Option<SearchResult>, GeocodeError> {
    let limit = limit.to_string();
    let resp = client
        .get(base_url)
        .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
        .send()
        .await
        .map_err(GeocodeError::from_reqwest)?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await.map_err(GeocodeError::from_reqwest)?;
    parse_response(&body)
}

/// Parses Nominatim JSON response, keeping only the first (best) match.
fn parse_response(body: &serde_json::Value) -> Result<Option<SearchResult>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"]
        .as_str()
        .map_or_else(|| format!("{lat:.4}, {lon:.4}"), String::from);

    Ok(Some(SearchResult {
        latitude: lat,
        longitude: lon,
        display_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "39.7817213",
            "lon": "-89.6501481",
            "display_name": "Springfield, Sangamon County, Illinois, United States"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 39.781_721_3).abs() < 1e-6);
        assert!((result.longitude - -89.650_148_1).abs() < 1e-6);
        assert!(result.display_name.starts_with("Springfield"));
    }

    #[test]
    fn keeps_only_first_match() {
        let body = serde_json::json!([
            { "lat": "1.0", "lon": "2.0", "display_name": "First" },
            { "lat": "3.0", "lon": "4.0", "display_name": "Second" }
        ]);
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.display_name, "First");
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_latitude() {
        let body = serde_json::json!([{ "lat": "north", "lon": "2.0" }]);
        assert!(parse_response(&body).is_err());
    }
}
