//! Projectflow: declarative automation rules for project boards.
//!
//! Rules pair a trigger (an event on an issue or pull request) with an
//! action (a mutation). The engine matches incoming notifications against
//! the rules of the projects an issue sits on and applies the resulting
//! actions through a per-call-tree dispatch queue, so cascades triggered by
//! the engine's own mutations terminate.
//!
//! Layers:
//! - `domain`: models, errors and port traits
//! - `services`: matching, dispatch, action interpretation, event adapters
//! - `adapters`: SQLite implementations of the storage ports
//! - `infrastructure`: configuration and logging
//! - `cli`: rule authoring commands

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult};
pub use services::{AutomationContext, AutomationEngine, AutomationEventHandler};
