//! Domain layer - Core intake logic with no I/O
//!
//! This layer contains:
//! - Entities: the intake draft, its store, and the wizard state machine
//! - Value Objects: identifiers, coordinates, location results, error kinds
//! - Domain Services: per-step validation predicates and the intake flows

pub mod entities;
pub mod services;
pub mod value_objects;
