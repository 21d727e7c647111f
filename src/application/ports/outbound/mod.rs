//! Outbound ports - Interfaces that the application requires from external systems

mod case_sink_port;
mod geocoder_port;
mod location_sensor_port;

pub use case_sink_port::{CaseSinkPort, CaseSubmission, SinkError, SubmissionReceipt};
pub use geocoder_port::{GeocodeError, GeocoderPort};
pub use location_sensor_port::{FixRequest, LocationSensorPort, Position, SensorError};
