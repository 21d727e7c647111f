//! Geocoder port - Reverse address lookup for a coordinate pair

use async_trait::async_trait;

use crate::domain::value_objects::Coordinates;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("geocoder response was not valid JSON: {0}")]
    Malformed(String),
    #[error("geocoder did not answer within the time limit")]
    TimedOut,
}

/// Port for reverse geocoding.
///
/// The response is handed back as an untyped document; callers look in it for
/// the keys they care about and tolerate any of them being absent.
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    async fn reverse(&self, coordinates: Coordinates) -> Result<serde_json::Value, GeocodeError>;
}
