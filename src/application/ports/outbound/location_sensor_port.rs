//! Location sensor port - The device's one-shot position provider
//!
//! Models the platform geolocation request as a single async call with a
//! three-way outcome: a fix, a coded provider error, or no sensor at all.

use std::time::Duration;

use async_trait::async_trait;

/// Options sent with a fix request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the provider may return; zero forces a fresh fix
    pub maximum_age: Duration,
}

impl FixRequest {
    pub fn fresh(timeout: Duration) -> Self {
        Self {
            high_accuracy: true,
            timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

/// A raw position as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius in metres, if the provider gave one
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("position sensor is not available on this platform")]
    Unsupported,
    /// Standard provider codes: 1 permission, 2 unavailable, 3 timeout
    #[error("position provider failed with code {0}")]
    Code(u16),
}

#[async_trait]
pub trait LocationSensorPort: Send + Sync {
    /// Whether the platform exposes a position sensor at all
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self, request: &FixRequest) -> Result<Position, SensorError>;
}
