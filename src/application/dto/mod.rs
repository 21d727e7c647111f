//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP layer can
//! serialize/deserialize without pulling request shapes into the domain model.

pub mod field_path;
pub mod intake;

pub use field_path::{parse_toggle, parse_update, FieldPathError};
pub use intake::*;
