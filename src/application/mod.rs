//! Application layer - Use cases orchestrating the domain
//!
//! This layer contains:
//! - Ports: sensor, geocoder and case sink boundaries
//! - Services: location capture, submission, and intake session handling
//! - DTOs: request parsing and the session view sent to renderers

pub mod dto;
pub mod ports;
pub mod services;
