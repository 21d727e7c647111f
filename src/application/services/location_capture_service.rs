//! Location Capture Service - Sensor fix, reverse geocode, graceful fallback
//!
//! A capture first asks the device for a fresh fix and classifies any sensor
//! failure. With a fix in hand it tries to resolve a street address; if that
//! lookup fails for any reason the bare coordinates are still returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{
    FixRequest, GeocodeError, GeocoderPort, LocationSensorPort, SensorError,
};
use crate::domain::value_objects::{Coordinates, ErrorKind, LocationResult};

/// Address components tried, in order, for a short landmark label
const LANDMARK_KEYS: [&str; 2] = ["road", "suburb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub fix_timeout: Duration,
    pub geocode_timeout: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            fix_timeout: Duration::from_secs(10),
            geocode_timeout: Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("a location capture is already in progress")]
    InProgress,
    #[error(transparent)]
    Failed(#[from] ErrorKind),
}

/// Clears the in-flight flag when the capture finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Two-tier location capture with a single in-flight guard
pub struct LocationCaptureService {
    geocoder: Arc<dyn GeocoderPort>,
    settings: CaptureSettings,
    busy: AtomicBool,
}

impl LocationCaptureService {
    pub fn new(geocoder: Arc<dyn GeocoderPort>, settings: CaptureSettings) -> Self {
        Self {
            geocoder,
            settings,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.busy))
    }

    /// Capture the current location.
    ///
    /// Rejected immediately with [`CaptureError::InProgress`] while another
    /// capture on this service is pending; the sensor is not touched.
    #[instrument(skip(self, sensor))]
    pub async fn capture<S>(&self, sensor: &S) -> Result<LocationResult, CaptureError>
    where
        S: LocationSensorPort + ?Sized,
    {
        let Some(_in_flight) = self.try_begin() else {
            debug!("Location capture already running, rejecting");
            return Err(CaptureError::InProgress);
        };

        let coordinates = self.acquire_fix(sensor).await.inspect_err(|kind| {
            info!(kind = ?kind, "Location capture failed");
        })?;

        let result = self.resolve_address(coordinates).await;
        info!(source = ?result.source, "Location captured");
        Ok(result)
    }

    async fn acquire_fix<S>(&self, sensor: &S) -> Result<Coordinates, ErrorKind>
    where
        S: LocationSensorPort + ?Sized,
    {
        if !sensor.is_supported() {
            return Err(ErrorKind::Unsupported);
        }

        let request = FixRequest::fresh(self.settings.fix_timeout);
        let position =
            match tokio::time::timeout(self.settings.fix_timeout, sensor.current_position(&request))
                .await
            {
                Err(_) => return Err(ErrorKind::Timeout),
                Ok(Err(SensorError::Unsupported)) => return Err(ErrorKind::Unsupported),
                Ok(Err(SensorError::Code(code))) => return Err(ErrorKind::from_position_code(code)),
                Ok(Ok(position)) => position,
            };

        Coordinates::new(position.latitude, position.longitude).map_err(|e| {
            warn!(error = %e, "Sensor produced an out-of-range fix");
            ErrorKind::PositionUnavailable
        })
    }

    /// Never fails: any lookup problem degrades to a raw result
    async fn resolve_address(&self, coordinates: Coordinates) -> LocationResult {
        let lookup =
            match tokio::time::timeout(self.settings.geocode_timeout, self.geocoder.reverse(coordinates))
                .await
            {
                Ok(lookup) => lookup,
                Err(_) => Err(GeocodeError::TimedOut),
            };

        match lookup.map(|document| parse_reverse_document(&document)) {
            Ok(Some(address)) => {
                LocationResult::geocoded(coordinates, address.display_name, address.landmark)
            }
            Ok(None) => {
                debug!("Geocoder returned no display address, keeping raw coordinates");
                LocationResult::raw(coordinates)
            }
            Err(e) => {
                warn!(error = %e, kind = ?ErrorKind::NetworkFailure, "Reverse geocoding failed, keeping raw coordinates");
                LocationResult::raw(coordinates)
            }
        }
    }
}

#[derive(Debug, PartialEq)]
struct ReverseAddress {
    display_name: String,
    landmark: String,
}

/// Pull the display address and a landmark out of a geocoder document
fn parse_reverse_document(document: &serde_json::Value) -> Option<ReverseAddress> {
    let display_name = document
        .get("display_name")?
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let landmark = document
        .get("address")
        .and_then(|address| {
            LANDMARK_KEYS.iter().find_map(|key| {
                address
                    .get(*key)
                    .and_then(|value| value.as_str())
                    .filter(|value| !value.trim().is_empty())
            })
        })
        .unwrap_or_default();

    Some(ReverseAddress {
        display_name: display_name.to_string(),
        landmark: landmark.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::Position;
    use crate::domain::value_objects::LocationSource;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Sensor that answers immediately with a fixed outcome
    struct FixedSensor {
        outcome: Result<Position, SensorError>,
        supported: bool,
        calls: AtomicUsize,
    }

    impl FixedSensor {
        fn at(latitude: f64, longitude: f64) -> Self {
            Self {
                outcome: Ok(Position {
                    latitude,
                    longitude,
                    accuracy: Some(12.0),
                }),
                supported: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(code: u16) -> Self {
            Self {
                outcome: Err(SensorError::Code(code)),
                supported: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn unsupported() -> Self {
            Self {
                supported: false,
                ..Self::failing(2)
            }
        }
    }

    #[async_trait]
    impl LocationSensorPort for FixedSensor {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn current_position(&self, request: &FixRequest) -> Result<Position, SensorError> {
            assert!(request.high_accuracy);
            assert_eq!(request.maximum_age, Duration::ZERO);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    /// Sensor that blocks until released
    struct GatedSensor {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    impl GatedSensor {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LocationSensorPort for GatedSensor {
        async fn current_position(&self, _request: &FixRequest) -> Result<Position, SensorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(Position {
                latitude: 13.05,
                longitude: 80.25,
                accuracy: None,
            })
        }
    }

    enum Lookup {
        Document(serde_json::Value),
        NetworkError,
        Status(u16),
        Hang,
    }

    struct StubGeocoder(Lookup);

    #[async_trait]
    impl GeocoderPort for StubGeocoder {
        async fn reverse(
            &self,
            _coordinates: Coordinates,
        ) -> Result<serde_json::Value, GeocodeError> {
            match &self.0 {
                Lookup::Document(doc) => Ok(doc.clone()),
                Lookup::NetworkError => Err(GeocodeError::Transport("connection refused".into())),
                Lookup::Status(code) => Err(GeocodeError::Status(*code)),
                Lookup::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(json!({}))
                }
            }
        }
    }

    fn service(lookup: Lookup) -> LocationCaptureService {
        LocationCaptureService::new(
            Arc::new(StubGeocoder(lookup)),
            CaptureSettings {
                fix_timeout: Duration::from_millis(200),
                geocode_timeout: Duration::from_millis(200),
            },
        )
    }

    fn anna_nagar() -> serde_json::Value {
        json!({
            "display_name": "Anna Nagar, Chennai",
            "address": { "road": "2nd Avenue", "suburb": "Anna Nagar" }
        })
    }

    #[tokio::test]
    async fn test_geocoded_capture() {
        let service = service(Lookup::Document(anna_nagar()));
        let result = service.capture(&FixedSensor::at(13.05, 80.25)).await.unwrap();

        assert_eq!(result.source, LocationSource::Geocoded);
        assert_eq!(result.address.as_deref(), Some("Anna Nagar, Chennai"));
        assert_eq!(result.landmark, "2nd Avenue");
        assert_eq!(result.coordinates, Coordinates { lat: 13.05, lng: 80.25 });
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_raw() {
        let service = service(Lookup::NetworkError);
        let result = service.capture(&FixedSensor::at(13.05, 80.25)).await.unwrap();

        assert_eq!(result.source, LocationSource::Raw);
        assert_eq!(result.landmark, "Location coordinates captured");
        assert!(result.address.is_none());
        assert_eq!(result.coordinates, Coordinates { lat: 13.05, lng: 80.25 });
    }

    #[tokio::test]
    async fn test_bad_status_and_empty_document_fall_back_to_raw() {
        let result = service(Lookup::Status(503))
            .capture(&FixedSensor::at(13.05, 80.25))
            .await
            .unwrap();
        assert_eq!(result.source, LocationSource::Raw);

        let result = service(Lookup::Document(json!({ "error": "Unable to geocode" })))
            .capture(&FixedSensor::at(13.05, 80.25))
            .await
            .unwrap();
        assert_eq!(result.source, LocationSource::Raw);
    }

    #[tokio::test]
    async fn test_geocode_timeout_falls_back_to_raw() {
        let result = service(Lookup::Hang)
            .capture(&FixedSensor::at(13.05, 80.25))
            .await
            .unwrap();
        assert_eq!(result.source, LocationSource::Raw);
    }

    #[tokio::test]
    async fn test_sensor_codes_are_classified() {
        let service = service(Lookup::Document(anna_nagar()));
        assert_eq!(
            service.capture(&FixedSensor::failing(1)).await,
            Err(CaptureError::Failed(ErrorKind::PermissionDenied))
        );
        assert_eq!(
            service.capture(&FixedSensor::failing(2)).await,
            Err(CaptureError::Failed(ErrorKind::PositionUnavailable))
        );
        assert_eq!(
            service.capture(&FixedSensor::failing(3)).await,
            Err(CaptureError::Failed(ErrorKind::Timeout))
        );
        assert_eq!(
            service.capture(&FixedSensor::failing(9)).await,
            Err(CaptureError::Failed(ErrorKind::PositionUnavailable))
        );
    }

    #[tokio::test]
    async fn test_unsupported_sensor_is_not_called() {
        let service = service(Lookup::Document(anna_nagar()));
        let sensor = FixedSensor::unsupported();
        assert_eq!(
            service.capture(&sensor).await,
            Err(CaptureError::Failed(ErrorKind::Unsupported))
        );
        assert_eq!(sensor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_fix_is_unavailable() {
        let service = service(Lookup::Document(anna_nagar()));
        assert_eq!(
            service.capture(&FixedSensor::at(123.0, 80.25)).await,
            Err(CaptureError::Failed(ErrorKind::PositionUnavailable))
        );
    }

    #[tokio::test]
    async fn test_silent_sensor_times_out() {
        let service = service(Lookup::Document(anna_nagar()));
        let sensor = GatedSensor::new();
        assert_eq!(
            service.capture(&sensor).await,
            Err(CaptureError::Failed(ErrorKind::Timeout))
        );
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_second_capture_rejected_while_pending() {
        let service = Arc::new(LocationCaptureService::new(
            Arc::new(StubGeocoder(Lookup::Document(anna_nagar()))),
            CaptureSettings::default(),
        ));
        let sensor = Arc::new(GatedSensor::new());

        let first = tokio::spawn({
            let service = service.clone();
            let sensor = sensor.clone();
            async move { service.capture(sensor.as_ref()).await }
        });

        sensor.entered.notified().await;
        assert!(service.is_busy());

        let second = service.capture(sensor.as_ref()).await;
        assert_eq!(second, Err(CaptureError::InProgress));
        assert_eq!(sensor.calls.load(Ordering::SeqCst), 1);

        sensor.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.source, LocationSource::Geocoded);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_capture_releases_guard() {
        let service = LocationCaptureService::new(
            Arc::new(StubGeocoder(Lookup::Document(anna_nagar()))),
            CaptureSettings::default(),
        );
        let sensor = GatedSensor::new();

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), service.capture(&sensor)).await;
        assert!(outcome.is_err());
        assert!(!service.is_busy());
    }

    #[test]
    fn test_landmark_lookup_order() {
        let suburb_only = json!({
            "display_name": "Velachery, Chennai",
            "address": { "suburb": "Velachery", "city": "Chennai" }
        });
        assert_eq!(
            parse_reverse_document(&suburb_only).map(|a| a.landmark),
            Some("Velachery".to_string())
        );

        let empty_road = json!({
            "display_name": "Somewhere",
            "address": { "road": "", "suburb": "Adyar" }
        });
        assert_eq!(
            parse_reverse_document(&empty_road).map(|a| a.landmark),
            Some("Adyar".to_string())
        );

        let no_address = json!({ "display_name": "Tambaram" });
        assert_eq!(
            parse_reverse_document(&no_address),
            Some(ReverseAddress {
                display_name: "Tambaram".to_string(),
                landmark: String::new(),
            })
        );

        assert_eq!(parse_reverse_document(&json!({ "display_name": 7 })), None);
        assert_eq!(parse_reverse_document(&json!([1, 2, 3])), None);
    }
}
