//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - HTTP: REST API routes for the intake wizard
//! - Nominatim: Reverse geocoding client
//! - Case sinks: HTTP and in-memory submission targets
//! - Device sensor: Replays renderer-reported position fixes
//! - Config: Application configuration
//! - State: Shared application state
//! - Session: Intake session registry

pub mod case_sink;
pub mod config;
pub mod device_sensor;
pub mod http;
pub mod nominatim;
pub mod session;
pub mod state;
