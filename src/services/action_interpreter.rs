//! Applies one resolved action to one issue through the issue service.
//!
//! Every branch checks its guard against a fresh issue snapshot and skips
//! mutations that would not change anything. Mutations raise notifications
//! through the issue service, which may re-enter the engine with the same
//! context.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Issue, ResolvedAction, UserId};
use crate::domain::ports::IssueService;
use crate::services::dispatch::{AutomationContext, DispatchQueueEntry};

pub struct ActionInterpreter {
    issues: Arc<dyn IssueService>,
}

impl ActionInterpreter {
    pub fn new(issues: Arc<dyn IssueService>) -> Self {
        Self { issues }
    }

    /// Apply `entry` and report whether it mutated the issue.
    pub async fn apply(&self, ctx: &AutomationContext, entry: &DispatchQueueEntry) -> DomainResult<bool> {
        let issue = self.issues.get_issue(ctx, entry.issue.id).await?;
        let actor = entry.actor;
        let action = entry.action.action;

        if let Some(reason) = guard_reason(&action, &issue, actor) {
            tracing::debug!(
                rule_id = entry.action.rule.id,
                issue_id = issue.id,
                action = action.kind().as_str(),
                reason,
                "Skipping automation action"
            );
            return Ok(false);
        }

        match action {
            ResolvedAction::NoOp => return Ok(false),
            ResolvedAction::Label { label_id } => {
                self.issues.add_label(ctx, issue.id, label_id, actor).await?;
            }
            ResolvedAction::Unlabel { label_id } => {
                self.issues.remove_label(ctx, issue.id, label_id, actor).await?;
            }
            ResolvedAction::Move {
                project_id,
                column_id,
            } => {
                self.issues
                    .move_to_column(ctx, issue.id, project_id, column_id, actor)
                    .await?;
            }
            ResolvedAction::StatusChange { closed } => {
                self.issues.change_status(ctx, issue.id, closed, actor).await?;
            }
            ResolvedAction::Assign => {
                self.issues.add_assignee(ctx, issue.id, actor, actor).await?;
            }
            ResolvedAction::Unassign => {
                self.issues.clear_assignees(ctx, issue.id, actor).await?;
            }
            ResolvedAction::AssignReviewer => {
                self.issues.request_review(ctx, issue.id, actor, actor).await?;
            }
            ResolvedAction::UnassignReviewers => {
                for reviewer in &issue.requested_reviewer_ids {
                    self.issues
                        .clear_review_request(ctx, issue.id, *reviewer, actor)
                        .await?;
                }
            }
            ResolvedAction::AssignToProject { project_id } => {
                self.issues.link_to_project(ctx, issue.id, project_id, actor).await?;
            }
            ResolvedAction::Approve => {
                self.issues.submit_approval(ctx, issue.id, actor).await?;
            }
        }

        tracing::info!(
            rule_id = entry.action.rule.id,
            issue_id = issue.id,
            action = action.kind().as_str(),
            correlation_id = %ctx.correlation_id(),
            "Applied automation action"
        );

        Ok(true)
    }
}

/// Why `action` would be a no-op on `issue`, or `None` when it should run.
pub fn guard_reason(action: &ResolvedAction, issue: &Issue, actor: UserId) -> Option<&'static str> {
    match *action {
        ResolvedAction::NoOp => Some("no-op action"),
        ResolvedAction::Label { label_id } if issue.has_label(label_id) => {
            Some("label already present")
        }
        ResolvedAction::Unlabel { label_id } if !issue.has_label(label_id) => {
            Some("label not present")
        }
        ResolvedAction::Move {
            project_id,
            column_id,
        } if issue.column_on(project_id) == Some(column_id) => {
            Some("already on target column")
        }
        ResolvedAction::StatusChange { closed } if issue.is_closed == closed => {
            Some("status already set")
        }
        ResolvedAction::Assign if !issue.assignee_ids.is_empty() => Some("already assigned"),
        ResolvedAction::Unassign if issue.assignee_ids.is_empty() => Some("no assignees"),
        ResolvedAction::AssignReviewer if !issue.requested_reviewer_ids.is_empty() => {
            Some("reviewer already requested")
        }
        ResolvedAction::UnassignReviewers if issue.requested_reviewer_ids.is_empty() => {
            Some("no requested reviewers")
        }
        ResolvedAction::AssignToProject { .. } if issue.is_on_any_board() => {
            Some("already linked to a project")
        }
        ResolvedAction::Approve if issue.poster_id == actor => Some("actor is the author"),
        ResolvedAction::Approve if issue.has_approval_from(actor) => Some("already approved"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ProjectMembership;

    fn issue() -> Issue {
        Issue {
            id: 1,
            poster_id: 100,
            label_ids: vec![7],
            memberships: vec![ProjectMembership {
                issue_id: 1,
                project_id: 3,
                column_id: 30,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_label_guards() {
        assert!(guard_reason(&ResolvedAction::Label { label_id: 7 }, &issue(), 5).is_some());
        assert!(guard_reason(&ResolvedAction::Label { label_id: 8 }, &issue(), 5).is_none());
        assert!(guard_reason(&ResolvedAction::Unlabel { label_id: 8 }, &issue(), 5).is_some());
        assert!(guard_reason(&ResolvedAction::Unlabel { label_id: 7 }, &issue(), 5).is_none());
    }

    #[test]
    fn test_move_and_status_guards() {
        let on_column = ResolvedAction::Move {
            project_id: 3,
            column_id: 30,
        };
        let elsewhere = ResolvedAction::Move {
            project_id: 3,
            column_id: 31,
        };
        assert!(guard_reason(&on_column, &issue(), 5).is_some());
        assert!(guard_reason(&elsewhere, &issue(), 5).is_none());

        assert!(guard_reason(&ResolvedAction::StatusChange { closed: false }, &issue(), 5).is_some());
        assert!(guard_reason(&ResolvedAction::StatusChange { closed: true }, &issue(), 5).is_none());
    }

    #[test]
    fn test_move_guard_checks_the_rule_project_board() {
        let mut two_boards = issue();
        two_boards.memberships.push(ProjectMembership {
            issue_id: 1,
            project_id: 4,
            column_id: 40,
        });

        let same_column = ResolvedAction::Move {
            project_id: 3,
            column_id: 30,
        };
        let other_board_column = ResolvedAction::Move {
            project_id: 3,
            column_id: 40,
        };
        assert_eq!(
            guard_reason(&same_column, &two_boards, 5),
            Some("already on target column")
        );
        assert!(guard_reason(&other_board_column, &two_boards, 5).is_none());
        assert!(guard_reason(
            &ResolvedAction::Move {
                project_id: 4,
                column_id: 40,
            },
            &two_boards,
            5
        )
        .is_some());
    }

    #[test]
    fn test_assignment_guards() {
        let mut assigned = issue();
        assigned.assignee_ids.push(9);
        assert!(guard_reason(&ResolvedAction::Assign, &assigned, 5).is_some());
        assert!(guard_reason(&ResolvedAction::Assign, &issue(), 5).is_none());
        assert!(guard_reason(&ResolvedAction::Unassign, &issue(), 5).is_some());
        assert!(guard_reason(&ResolvedAction::Unassign, &assigned, 5).is_none());
    }

    #[test]
    fn test_review_guards() {
        let mut pr = issue();
        pr.is_pull = true;
        assert!(guard_reason(&ResolvedAction::UnassignReviewers, &pr, 5).is_some());
        assert!(guard_reason(&ResolvedAction::AssignReviewer, &pr, 5).is_none());

        pr.requested_reviewer_ids.push(9);
        assert!(guard_reason(&ResolvedAction::AssignReviewer, &pr, 5).is_some());
        assert!(guard_reason(&ResolvedAction::UnassignReviewers, &pr, 5).is_none());
    }

    #[test]
    fn test_approve_guards() {
        let mut pr = issue();
        pr.is_pull = true;
        assert_eq!(
            guard_reason(&ResolvedAction::Approve, &pr, 100),
            Some("actor is the author")
        );
        assert!(guard_reason(&ResolvedAction::Approve, &pr, 5).is_none());

        pr.approver_ids.push(5);
        assert_eq!(
            guard_reason(&ResolvedAction::Approve, &pr, 5),
            Some("already approved")
        );
    }

    #[test]
    fn test_project_guard() {
        let linked = issue();
        let mut unlinked = issue();
        unlinked.memberships.clear();
        let action = ResolvedAction::AssignToProject { project_id: 3 };
        assert!(guard_reason(&action, &linked, 5).is_some());
        assert!(guard_reason(&action, &unlinked, 5).is_none());
    }
}
