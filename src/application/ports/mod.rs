//! Ports - Interfaces the application layer depends on

pub mod outbound;
