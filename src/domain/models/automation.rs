//! Automation rule domain model.
//!
//! An `AutomationRule` belongs to a project and pairs a trigger signature
//! (`TriggerKind` + integer payload) with an action (`ActionKind` + integer
//! payload). Rules are authored through the CRUD layer; the engine only
//! reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::{ColumnId, IssueKind, LabelId, ProjectId};

/// Stable identity of an automation rule.
pub type RuleId = i64;

/// Column id value meaning "any column in the project".
pub const ANY_COLUMN: ColumnId = 0;

/// Kind of event a rule listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Issue moved to a column. Payload: column id.
    Move,
    /// Issue opened or closed. Payload: 0 = open, 1 = closed.
    StatusChange,
    Assign,
    Unassign,
    /// Label added. Payload: label id.
    Label,
    /// Label removed. Payload: label id.
    Unlabel,
    AssignToProject,
    /// First reviewer requested on a pull request.
    AssignReviewer,
    /// Last requested reviewer removed from a pull request.
    UnassignReviewers,
    Approve,
    /// Pull request references the issue. Payload: cross-reference action code.
    CrossReference,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::StatusChange => "status_change",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Label => "label",
            Self::Unlabel => "unlabel",
            Self::AssignToProject => "assign_to_project",
            Self::AssignReviewer => "assign_reviewer",
            Self::UnassignReviewers => "unassign_reviewers",
            Self::Approve => "approve",
            Self::CrossReference => "cross_reference",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "move" => Some(Self::Move),
            "status" | "status_change" => Some(Self::StatusChange),
            "assign" => Some(Self::Assign),
            "unassign" => Some(Self::Unassign),
            "label" => Some(Self::Label),
            "unlabel" => Some(Self::Unlabel),
            "project" | "assign_to_project" => Some(Self::AssignToProject),
            "review_request" | "assign_reviewer" => Some(Self::AssignReviewer),
            "review_unrequest" | "unassign_reviewers" => Some(Self::UnassignReviewers),
            "approve" => Some(Self::Approve),
            "xref" | "cross_reference" => Some(Self::CrossReference),
            _ => None,
        }
    }
}

/// Kind of mutation a rule performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    NoOp,
    Move,
    StatusChange,
    Assign,
    Unassign,
    Label,
    Unlabel,
    AssignToProject,
    AssignReviewer,
    UnassignReviewers,
    Approve,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoOp => "noop",
            Self::Move => "move",
            Self::StatusChange => "status_change",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Label => "label",
            Self::Unlabel => "unlabel",
            Self::AssignToProject => "assign_to_project",
            Self::AssignReviewer => "assign_reviewer",
            Self::UnassignReviewers => "unassign_reviewers",
            Self::Approve => "approve",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "noop" | "no_op" => Some(Self::NoOp),
            "move" => Some(Self::Move),
            "status" | "status_change" => Some(Self::StatusChange),
            "assign" => Some(Self::Assign),
            "unassign" => Some(Self::Unassign),
            "label" => Some(Self::Label),
            "unlabel" => Some(Self::Unlabel),
            "project" | "assign_to_project" => Some(Self::AssignToProject),
            "review_request" | "assign_reviewer" => Some(Self::AssignReviewer),
            "review_unrequest" | "unassign_reviewers" => Some(Self::UnassignReviewers),
            "approve" => Some(Self::Approve),
            _ => None,
        }
    }

    /// Whether the action only makes sense on pull requests.
    pub fn is_review_action(&self) -> bool {
        matches!(
            self,
            Self::AssignReviewer | Self::UnassignReviewers | Self::Approve
        )
    }
}

/// Which issue kinds a rule's action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    /// Derived from the rule's action and trigger kinds.
    #[default]
    Default,
    Issue,
    PullRequest,
    Both,
}

impl ActionTarget {
    /// Whether this explicit target includes `kind`. `Default` includes nothing;
    /// callers resolve it first.
    pub fn includes(&self, kind: IssueKind) -> bool {
        match self {
            Self::Default => false,
            Self::Issue => kind == IssueKind::Issue,
            Self::PullRequest => kind == IssueKind::PullRequest,
            Self::Both => true,
        }
    }

    /// Combine two targets, used when several kinds are listed.
    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (Self::Default, t) | (t, Self::Default) => t,
            (a, b) if a == b => a,
            _ => Self::Both,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
            Self::Both => "both",
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Default => 0,
            Self::Issue => 1,
            Self::PullRequest => 2,
            Self::Both => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Default),
            1 => Some(Self::Issue),
            2 => Some(Self::PullRequest),
            3 => Some(Self::Both),
            _ => None,
        }
    }
}

/// A declarative project automation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRule {
    /// Assigned by the rule store on create; 0 before that.
    pub id: RuleId,
    pub enabled: bool,
    pub project_id: ProjectId,
    /// `ANY_COLUMN` (0) matches every column of the project.
    pub column_id: ColumnId,
    pub trigger_kind: TriggerKind,
    pub trigger_data: i64,
    pub action_kind: ActionKind,
    pub action_data: i64,
    pub action_target: ActionTarget,
    /// Presentation only, never evaluation order.
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AutomationRule {
    pub fn new(
        project_id: ProjectId,
        trigger_kind: TriggerKind,
        trigger_data: i64,
        action_kind: ActionKind,
        action_data: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            enabled: true,
            project_id,
            column_id: ANY_COLUMN,
            trigger_kind,
            trigger_data,
            action_kind,
            action_data,
            action_target: ActionTarget::Default,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: RuleId) -> Self {
        self.id = id;
        self
    }

    pub fn with_column(mut self, column_id: ColumnId) -> Self {
        self.column_id = column_id;
        self
    }

    pub fn with_target(mut self, target: ActionTarget) -> Self {
        self.action_target = target;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Resolve the integer action payload into its typed form.
    pub fn resolved_action(&self) -> ResolvedAction {
        match self.action_kind {
            ActionKind::NoOp => ResolvedAction::NoOp,
            ActionKind::Move => ResolvedAction::Move {
                project_id: self.project_id,
                column_id: self.action_data,
            },
            ActionKind::StatusChange => ResolvedAction::StatusChange {
                closed: self.action_data > 0,
            },
            ActionKind::Assign => ResolvedAction::Assign,
            ActionKind::Unassign => ResolvedAction::Unassign,
            ActionKind::Label => ResolvedAction::Label {
                label_id: self.action_data,
            },
            ActionKind::Unlabel => ResolvedAction::Unlabel {
                label_id: self.action_data,
            },
            ActionKind::AssignToProject => ResolvedAction::AssignToProject {
                project_id: self.project_id,
            },
            ActionKind::AssignReviewer => ResolvedAction::AssignReviewer,
            ActionKind::UnassignReviewers => ResolvedAction::UnassignReviewers,
            ActionKind::Approve => ResolvedAction::Approve,
        }
    }
}

/// An action with its payload decoded, ready for the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAction {
    NoOp,
    Move {
        project_id: ProjectId,
        column_id: ColumnId,
    },
    StatusChange {
        closed: bool,
    },
    Assign,
    Unassign,
    Label {
        label_id: LabelId,
    },
    Unlabel {
        label_id: LabelId,
    },
    AssignToProject {
        project_id: ProjectId,
    },
    AssignReviewer,
    UnassignReviewers,
    Approve,
}

impl ResolvedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::NoOp => ActionKind::NoOp,
            Self::Move { .. } => ActionKind::Move,
            Self::StatusChange { .. } => ActionKind::StatusChange,
            Self::Assign => ActionKind::Assign,
            Self::Unassign => ActionKind::Unassign,
            Self::Label { .. } => ActionKind::Label,
            Self::Unlabel { .. } => ActionKind::Unlabel,
            Self::AssignToProject { .. } => ActionKind::AssignToProject,
            Self::AssignReviewer => ActionKind::AssignReviewer,
            Self::UnassignReviewers => ActionKind::UnassignReviewers,
            Self::Approve => ActionKind::Approve,
        }
    }
}

/// One matched rule, resolved into something the dispatch queue can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub rule: AutomationRule,
    pub action: ResolvedAction,
}

impl PendingAction {
    pub fn from_rule(rule: AutomationRule) -> Self {
        let action = rule.resolved_action();
        Self { rule, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_through_str() {
        for kind in [
            TriggerKind::Move,
            TriggerKind::StatusChange,
            TriggerKind::AssignReviewer,
            TriggerKind::CrossReference,
        ] {
            assert_eq!(TriggerKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::from_str("no-op"), Some(ActionKind::NoOp));
        assert_eq!(ActionKind::from_str("xref"), None);
    }

    #[test]
    fn test_target_union() {
        assert_eq!(
            ActionTarget::Issue.union(ActionTarget::PullRequest),
            ActionTarget::Both
        );
        assert_eq!(
            ActionTarget::Default.union(ActionTarget::Issue),
            ActionTarget::Issue
        );
        assert_eq!(ActionTarget::from_i64(4), None);
    }

    #[test]
    fn test_resolved_action_uses_rule_project() {
        let rule = AutomationRule::new(7, TriggerKind::Label, 3, ActionKind::Move, 12);
        assert_eq!(
            rule.resolved_action(),
            ResolvedAction::Move {
                project_id: 7,
                column_id: 12
            }
        );

        let rule = AutomationRule::new(7, TriggerKind::Label, 3, ActionKind::AssignToProject, 99);
        assert_eq!(
            rule.resolved_action(),
            ResolvedAction::AssignToProject { project_id: 7 }
        );

        let rule = AutomationRule::new(7, TriggerKind::Label, 3, ActionKind::StatusChange, 0);
        assert_eq!(
            rule.resolved_action(),
            ResolvedAction::StatusChange { closed: false }
        );
    }
}
