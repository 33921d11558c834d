//! Domain notifications that feed the automation engine.
//!
//! Each variant is raised by an issue collaborator after it mutates state and
//! is translated into trigger signatures by the event adapters.

use serde::{Deserialize, Serialize};

use super::issue::{ColumnId, IssueId, IssueRef, LabelId, ProjectId, UserId};

/// A domain notification about an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueEvent {
    /// Issue was closed or reopened.
    StatusChanged {
        issue: IssueRef,
        actor: UserId,
        is_closed: bool,
    },
    /// Labels were added and/or removed in one edit.
    LabelsChanged {
        issue: IssueRef,
        actor: UserId,
        added: Vec<LabelId>,
        removed: Vec<LabelId>,
    },
    /// A reviewer was requested (`is_request`) or unrequested.
    /// `remaining_reviewers` is the reviewer count after the change.
    ReviewRequestChanged {
        pull_request: IssueRef,
        actor: UserId,
        reviewer_id: UserId,
        is_request: bool,
        remaining_reviewers: usize,
    },
    /// A pull request received an approving review.
    ReviewApproved { pull_request: IssueRef, actor: UserId },
    /// A pull request was opened.
    PullRequestOpened { pull_request: IssueRef, actor: UserId },
    /// Issues were dragged onto a column of a project board.
    IssuesMoved {
        project_id: ProjectId,
        target_column_id: ColumnId,
        actor: UserId,
        moves: Vec<ColumnMove>,
    },
}

/// One issue in a board move, with the column it sat on before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMove {
    pub issue: IssueRef,
    pub from_column_id: ColumnId,
}

impl IssueEvent {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::StatusChanged { .. } => "StatusChanged",
            Self::LabelsChanged { .. } => "LabelsChanged",
            Self::ReviewRequestChanged { .. } => "ReviewRequestChanged",
            Self::ReviewApproved { .. } => "ReviewApproved",
            Self::PullRequestOpened { .. } => "PullRequestOpened",
            Self::IssuesMoved { .. } => "IssuesMoved",
        }
    }

    pub fn actor(&self) -> UserId {
        match self {
            Self::StatusChanged { actor, .. }
            | Self::LabelsChanged { actor, .. }
            | Self::ReviewRequestChanged { actor, .. }
            | Self::ReviewApproved { actor, .. }
            | Self::PullRequestOpened { actor, .. }
            | Self::IssuesMoved { actor, .. } => *actor,
        }
    }

    /// Primary issue id, for log context. Board moves report the first issue.
    pub fn issue_id(&self) -> Option<IssueId> {
        match self {
            Self::StatusChanged { issue, .. } | Self::LabelsChanged { issue, .. } => Some(issue.id),
            Self::ReviewRequestChanged { pull_request, .. }
            | Self::ReviewApproved { pull_request, .. }
            | Self::PullRequestOpened { pull_request, .. } => Some(pull_request.id),
            Self::IssuesMoved { moves, .. } => moves.first().map(|m| m.issue.id),
        }
    }
}
