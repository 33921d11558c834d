//! Decides whether a rule's action applies to an issue or a pull request.

use crate::domain::models::{ActionTarget, AutomationRule, IssueKind, TriggerKind};

/// Target used when a rule does not set one explicitly.
///
/// Reviewer and approval actions only apply to pull requests. Cross-reference
/// rules apply to the referenced issue only. Everything else applies to both,
/// even when the trigger itself can only come from a pull request.
pub fn default_target(rule: &AutomationRule) -> ActionTarget {
    if rule.action_kind.is_review_action() {
        ActionTarget::PullRequest
    } else if rule.trigger_kind == TriggerKind::CrossReference {
        ActionTarget::Issue
    } else {
        ActionTarget::Both
    }
}

/// The explicit target of `rule`, or its derived default.
pub fn effective_target(rule: &AutomationRule) -> ActionTarget {
    match rule.action_target {
        ActionTarget::Default => default_target(rule),
        explicit => explicit,
    }
}

pub fn should_run_for(rule: &AutomationRule, kind: IssueKind) -> bool {
    effective_target(rule).includes(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ActionKind;

    fn rule(trigger: TriggerKind, action: ActionKind) -> AutomationRule {
        AutomationRule::new(1, trigger, 0, action, 0)
    }

    #[test]
    fn test_approve_defaults_to_pull_requests() {
        let r = rule(TriggerKind::Label, ActionKind::Approve);
        assert!(!should_run_for(&r, IssueKind::Issue));
        assert!(should_run_for(&r, IssueKind::PullRequest));

        let r = rule(TriggerKind::Move, ActionKind::UnassignReviewers);
        assert!(!should_run_for(&r, IssueKind::Issue));
        assert!(should_run_for(&r, IssueKind::PullRequest));
    }

    #[test]
    fn test_cross_reference_defaults_to_issues() {
        let r = rule(TriggerKind::CrossReference, ActionKind::StatusChange);
        assert!(should_run_for(&r, IssueKind::Issue));
        assert!(!should_run_for(&r, IssueKind::PullRequest));
    }

    #[test]
    fn test_review_action_wins_over_cross_reference() {
        let r = rule(TriggerKind::CrossReference, ActionKind::AssignReviewer);
        assert_eq!(default_target(&r), ActionTarget::PullRequest);
    }

    // Current behavior: a non-review action fires on both kinds even when the
    // trigger can only originate from a pull request.
    #[test]
    fn test_pull_request_trigger_with_plain_action_targets_both() {
        let r = rule(TriggerKind::AssignReviewer, ActionKind::Label);
        assert!(should_run_for(&r, IssueKind::Issue));
        assert!(should_run_for(&r, IssueKind::PullRequest));
    }

    #[test]
    fn test_explicit_target_overrides_default() {
        let r = rule(TriggerKind::Label, ActionKind::Approve).with_target(ActionTarget::Issue);
        assert!(should_run_for(&r, IssueKind::Issue));
        assert!(!should_run_for(&r, IssueKind::PullRequest));

        let r = rule(TriggerKind::CrossReference, ActionKind::Label).with_target(ActionTarget::Both);
        assert!(should_run_for(&r, IssueKind::PullRequest));
    }
}
