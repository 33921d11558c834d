pub mod action_interpreter;
pub mod action_target;
pub mod automation_engine;
pub mod dispatch;
pub mod event_adapters;
pub mod rule_parser;
pub mod trigger_matcher;

pub use action_interpreter::ActionInterpreter;
pub use automation_engine::AutomationEngine;
pub use dispatch::{AutomationContext, DispatchQueueEntry, DispatchScope, EnqueueOutcome};
pub use event_adapters::AutomationEventHandler;
pub use rule_parser::{parse_rule, RuleText};
pub use trigger_matcher::TriggerMatcher;
