//! Issue and pull request snapshots as seen by the automation engine.
//!
//! The engine never owns issue state; it reads a fresh `Issue` snapshot from
//! the issue service before checking an action's guard.

use serde::{Deserialize, Serialize};

pub type IssueId = i64;
pub type ProjectId = i64;
pub type ColumnId = i64;
pub type LabelId = i64;
pub type UserId = i64;

/// Whether an issue is a plain issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Issue,
    PullRequest,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

/// Identity of the issue a dispatch runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: IssueId,
    pub kind: IssueKind,
}

impl IssueRef {
    pub fn issue(id: IssueId) -> Self {
        Self {
            id,
            kind: IssueKind::Issue,
        }
    }

    pub fn pull_request(id: IssueId) -> Self {
        Self {
            id,
            kind: IssueKind::PullRequest,
        }
    }
}

/// Point-in-time view of an issue, used for idempotence guards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub is_pull: bool,
    pub is_closed: bool,
    pub poster_id: UserId,
    pub label_ids: Vec<LabelId>,
    pub assignee_ids: Vec<UserId>,
    /// Pending review requests (pull requests only).
    pub requested_reviewer_ids: Vec<UserId>,
    /// Users with an approving review (pull requests only).
    pub approver_ids: Vec<UserId>,
    /// Every project board the issue sits on, at most one row per project.
    pub memberships: Vec<ProjectMembership>,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        if self.is_pull {
            IssueKind::PullRequest
        } else {
            IssueKind::Issue
        }
    }

    pub fn to_ref(&self) -> IssueRef {
        IssueRef {
            id: self.id,
            kind: self.kind(),
        }
    }

    pub fn has_label(&self, label_id: LabelId) -> bool {
        self.label_ids.contains(&label_id)
    }

    pub fn has_approval_from(&self, user_id: UserId) -> bool {
        self.approver_ids.contains(&user_id)
    }

    /// Column the issue occupies on `project_id`'s board.
    pub fn column_on(&self, project_id: ProjectId) -> Option<ColumnId> {
        self.memberships
            .iter()
            .find(|m| m.project_id == project_id)
            .map(|m| m.column_id)
    }

    pub fn is_on_any_board(&self) -> bool {
        !self.memberships.is_empty()
    }
}

/// One project-board row that places an issue in a project column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub issue_id: IssueId,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
}

/// Effect a cross-reference has once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XRefAction {
    /// Plain mention.
    None,
    Closes,
    Reopens,
    /// No longer affects the source.
    Neutered,
}

impl XRefAction {
    pub fn code(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Closes => 1,
            Self::Reopens => 2,
            Self::Neutered => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Closes),
            2 => Some(Self::Reopens),
            3 => Some(Self::Neutered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Closes => "closes",
            Self::Reopens => "reopens",
            Self::Neutered => "neutered",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "mention" => Some(Self::None),
            "closes" | "close" => Some(Self::Closes),
            "reopens" | "reopen" => Some(Self::Reopens),
            "neutered" => Some(Self::Neutered),
            _ => None,
        }
    }
}

/// A resolved reference from a pull request to another issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub issue_id: IssueId,
    pub action: XRefAction,
}
