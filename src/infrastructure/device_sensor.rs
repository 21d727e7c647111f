//! Device-reported fixes
//!
//! Over HTTP the position sensor lives in the renderer. It performs the
//! platform request itself and posts the outcome; this adapter replays that
//! report through the sensor port so the capture pipeline is unchanged.

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::outbound::{FixRequest, LocationSensorPort, Position, SensorError};

/// Outcome of the renderer's own position request
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceFixReport {
    Position {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        accuracy: Option<f64>,
    },
    Error {
        code: u16,
    },
    Unsupported,
    /// The renderer gave up waiting and never got an answer
    Pending,
}

pub struct ReportedFixSensor {
    report: DeviceFixReport,
}

impl ReportedFixSensor {
    pub fn new(report: DeviceFixReport) -> Self {
        Self { report }
    }
}

#[async_trait]
impl LocationSensorPort for ReportedFixSensor {
    fn is_supported(&self) -> bool {
        !matches!(self.report, DeviceFixReport::Unsupported)
    }

    async fn current_position(&self, _request: &FixRequest) -> Result<Position, SensorError> {
        match self.report {
            DeviceFixReport::Position {
                latitude,
                longitude,
                accuracy,
            } => Ok(Position {
                latitude,
                longitude,
                accuracy,
            }),
            DeviceFixReport::Error { code } => Err(SensorError::Code(code)),
            DeviceFixReport::Unsupported => Err(SensorError::Unsupported),
            // Never resolves; the capture deadline turns this into a timeout
            DeviceFixReport::Pending => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn parse(value: serde_json::Value) -> DeviceFixReport {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_position_report_replays_fix() {
        let sensor = ReportedFixSensor::new(parse(json!({
            "status": "position",
            "latitude": 13.05,
            "longitude": 80.28
        })));

        let position = sensor
            .current_position(&FixRequest::fresh(Duration::from_secs(10)))
            .await
            .unwrap();

        assert!(sensor.is_supported());
        assert_eq!(position.latitude, 13.05);
        assert_eq!(position.accuracy, None);
    }

    #[tokio::test]
    async fn test_error_and_unsupported_reports() {
        let denied = ReportedFixSensor::new(parse(json!({ "status": "error", "code": 1 })));
        assert_eq!(
            denied
                .current_position(&FixRequest::fresh(Duration::from_secs(10)))
                .await,
            Err(SensorError::Code(1))
        );

        let unsupported = ReportedFixSensor::new(parse(json!({ "status": "unsupported" })));
        assert!(!unsupported.is_supported());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result: Result<DeviceFixReport, _> =
            serde_json::from_value(json!({ "status": "teleported" }));
        assert!(result.is_err());
    }
}
