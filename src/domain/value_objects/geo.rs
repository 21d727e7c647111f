//! Geographic value objects produced by location capture

use serde::{Deserialize, Serialize};

/// Landmark used when only bare coordinates could be captured
pub const RAW_FALLBACK_LANDMARK: &str = "Location coordinates captured";

/// A latitude/longitude pair at full sensor precision
///
/// Both halves are always present together; a draft either has a
/// `Coordinates` or has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Where a captured location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Sensor fix plus a reverse-geocoded address
    Geocoded,
    /// Sensor fix only; the address lookup failed
    Raw,
}

/// Outcome of a successful location capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub source: LocationSource,
    pub coordinates: Coordinates,
    /// Only present for geocoded results
    pub address: Option<String>,
    pub landmark: String,
}

impl LocationResult {
    pub fn geocoded(
        coordinates: Coordinates,
        address: impl Into<String>,
        landmark: impl Into<String>,
    ) -> Self {
        Self {
            source: LocationSource::Geocoded,
            coordinates,
            address: Some(address.into()),
            landmark: landmark.into(),
        }
    }

    pub fn raw(coordinates: Coordinates) -> Self {
        Self {
            source: LocationSource::Raw,
            coordinates,
            address: None,
            landmark: RAW_FALLBACK_LANDMARK.to_string(),
        }
    }

    /// Success message shown to the operator after a capture
    pub fn notice(&self) -> &'static str {
        match self.source {
            LocationSource::Geocoded => "Location captured successfully!",
            LocationSource::Raw => "Coordinates captured successfully!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinates::new(13.05, 80.25).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert_eq!(
            Coordinates::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.1),
            Err(CoordinateError::Longitude(-180.1))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_raw_result_has_no_address() {
        let coords = Coordinates::new(13.05, 80.25).unwrap();
        let result = LocationResult::raw(coords);
        assert_eq!(result.source, LocationSource::Raw);
        assert!(result.address.is_none());
        assert_eq!(result.landmark, RAW_FALLBACK_LANDMARK);
        assert_eq!(result.notice(), "Coordinates captured successfully!");
    }

    #[test]
    fn test_display_keeps_six_decimals() {
        let coords = Coordinates::new(13.0512345678, 80.25).unwrap();
        assert_eq!(coords.to_string(), "13.051235, 80.250000");
        // Full precision retained internally
        assert_eq!(coords.lat, 13.0512345678);
    }
}
