pub mod automation;
pub mod config;
pub mod event;
pub mod issue;

pub use automation::{
    ActionKind, ActionTarget, AutomationRule, PendingAction, ResolvedAction, RuleId, TriggerKind,
    ANY_COLUMN,
};
pub use config::{AutomationConfig, Config, DatabaseConfig, LoggingConfig};
pub use event::{ColumnMove, IssueEvent};
pub use issue::{
    ColumnId, CrossReference, Issue, IssueId, IssueKind, IssueRef, LabelId, ProjectId,
    ProjectMembership, UserId, XRefAction,
};
