//! Classified failure kinds shared by the wizard and location capture
//!
//! The `Display` text of each kind is the message shown to the operator in
//! place, without leaving the current step.

use serde::{Deserialize, Serialize};

/// Closed set of failure classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,
    #[error("Location information unavailable. Please try again.")]
    PositionUnavailable,
    #[error("Location request timed out. Please try again.")]
    Timeout,
    #[error("Location capture is not supported on this device.")]
    Unsupported,
    #[error("Could not reach the address lookup service.")]
    NetworkFailure,
    #[error("Please fill in all required fields")]
    ValidationFailed,
    #[error("Failed to submit form. Please try again.")]
    SubmissionFailed,
}

impl ErrorKind {
    /// Map a standard position-provider error code to a kind.
    ///
    /// 1 = permission denied, 2 = position unavailable, 3 = timeout. Any other
    /// code is treated as an unavailable position.
    pub fn from_position_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    /// Whether the operator can simply try again without changing anything.
    ///
    /// Denied permissions and unsupported devices need the underlying cause
    /// resolved first.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::PermissionDenied | Self::Unsupported)
    }

    /// Whether this kind came out of the location capture pipeline
    pub fn is_location_error(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied
                | Self::PositionUnavailable
                | Self::Timeout
                | Self::Unsupported
                | Self::NetworkFailure
        )
    }
}
