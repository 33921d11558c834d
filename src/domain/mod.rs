//! Domain layer for the projectflow automation engine
//!
//! This module contains the rule and issue models, the domain error type, and
//! the port traits the engine consumes from external collaborators.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
