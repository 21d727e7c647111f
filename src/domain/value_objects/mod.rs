//! Value objects - Immutable objects defined by their attributes

mod error_kind;
mod geo;
mod ids;

pub use error_kind::ErrorKind;
pub use geo::{CoordinateError, Coordinates, LocationResult, LocationSource};
pub use ids::*;
