//! Device location lookup.

use risk_lens_risk_models::Coordinate;
use thiserror::Error;

/// The device location could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unable to retrieve your location")]
pub struct LocationUnavailable;

/// Source of the user's current position.
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the current position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationUnavailable`] if no position can be determined.
    async fn current_location(&self) -> Result<Coordinate, LocationUnavailable>;
}

/// Provider for environments without positioning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait::async_trait]
impl LocationProvider for NoLocation {
    async fn current_location(&self) -> Result<Coordinate, LocationUnavailable> {
        Err(LocationUnavailable)
    }
}

/// Provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait::async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinate, LocationUnavailable> {
        if self.0.is_finite() {
            Ok(self.0)
        } else {
            Err(LocationUnavailable)
        }
    }
}

/// Reads a fixed position from `RISK_LENS_LOCATION` (`"lat,lon"`).
///
/// Returns [`NoLocation`] behaviour when the variable is unset or malformed.
#[must_use]
pub fn location_from_env() -> Box<dyn LocationProvider> {
    let parsed = std::env::var("RISK_LENS_LOCATION").ok().and_then(|value| {
        let (lat, lon) = value.split_once(',')?;
        Some(Coordinate::new(
            lat.trim().parse().ok()?,
            lon.trim().parse().ok()?,
        ))
    });

    match parsed {
        Some(coordinate) => Box::new(FixedLocation(coordinate)),
        None => Box::new(NoLocation),
    }
}
