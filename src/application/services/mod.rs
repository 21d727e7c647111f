//! Application services - Use case implementations
//!
//! Services depend only on outbound ports; concrete adapters are wired in
//! `infrastructure::state`.

pub mod intake_service;
pub mod location_capture_service;
pub mod submission_service;

pub use intake_service::{IntakeError, IntakeService};
pub use location_capture_service::{CaptureSettings, LocationCaptureService};
