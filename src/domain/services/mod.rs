//! Domain services - Pure business rules over domain entities

pub mod step_validation;

pub use step_validation::{IntakeFlow, StepId};
