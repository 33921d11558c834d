//! Finds the enabled rules whose trigger matches an event on an issue.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AutomationRule, IssueId, PendingAction, ProjectId, ProjectMembership, TriggerKind, ANY_COLUMN,
};
use crate::domain::ports::{AutomationRuleRepository, ProjectMembershipRepository};

pub struct TriggerMatcher {
    rules: Arc<dyn AutomationRuleRepository>,
    memberships: Arc<dyn ProjectMembershipRepository>,
}

impl TriggerMatcher {
    pub fn new(
        rules: Arc<dyn AutomationRuleRepository>,
        memberships: Arc<dyn ProjectMembershipRepository>,
    ) -> Self {
        Self { rules, memberships }
    }

    /// Resolve every enabled rule in the issue's projects that matches the
    /// signature `(trigger_kind, trigger_data)`.
    ///
    /// Results follow the store's return order. An issue on no board yields
    /// an empty set.
    pub async fn find_matches(
        &self,
        issue_id: IssueId,
        trigger_kind: TriggerKind,
        trigger_data: i64,
    ) -> DomainResult<Vec<PendingAction>> {
        let memberships = self.memberships.find_by_issue(issue_id).await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<ProjectId> = memberships
            .iter()
            .map(|m| m.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rules = self.rules.find_by_project_ids(&project_ids, true).await?;

        let matches: Vec<PendingAction> = rules
            .into_iter()
            .filter(|rule| {
                memberships
                    .iter()
                    .any(|m| rule_matches(rule, m, trigger_kind, trigger_data))
            })
            .map(PendingAction::from_rule)
            .collect();

        tracing::debug!(
            issue_id,
            trigger = trigger_kind.as_str(),
            trigger_data,
            matched = matches.len(),
            "Matched automation rules"
        );

        Ok(matches)
    }
}

/// Whether `rule` fires for an issue placed by `membership`.
pub fn rule_matches(
    rule: &AutomationRule,
    membership: &ProjectMembership,
    trigger_kind: TriggerKind,
    trigger_data: i64,
) -> bool {
    rule.enabled
        && rule.project_id == membership.project_id
        && rule.trigger_kind == trigger_kind
        && rule.trigger_data == trigger_data
        && (rule.column_id == ANY_COLUMN || rule.column_id == membership.column_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ActionKind;

    fn membership(project_id: ProjectId, column_id: i64) -> ProjectMembership {
        ProjectMembership {
            issue_id: 42,
            project_id,
            column_id,
        }
    }

    #[test]
    fn test_any_column_matches_every_column() {
        let rule = AutomationRule::new(1, TriggerKind::Label, 3, ActionKind::NoOp, 0);
        assert!(rule_matches(&rule, &membership(1, 5), TriggerKind::Label, 3));
        assert!(rule_matches(&rule, &membership(1, 9), TriggerKind::Label, 3));
    }

    #[test]
    fn test_scoped_column_matches_only_that_column() {
        let rule =
            AutomationRule::new(1, TriggerKind::Label, 3, ActionKind::NoOp, 0).with_column(5);
        assert!(rule_matches(&rule, &membership(1, 5), TriggerKind::Label, 3));
        assert!(!rule_matches(&rule, &membership(1, 6), TriggerKind::Label, 3));
    }

    #[test]
    fn test_signature_and_project_must_match() {
        let rule = AutomationRule::new(1, TriggerKind::Label, 3, ActionKind::NoOp, 0);
        assert!(!rule_matches(&rule, &membership(2, 5), TriggerKind::Label, 3));
        assert!(!rule_matches(&rule, &membership(1, 5), TriggerKind::Unlabel, 3));
        assert!(!rule_matches(&rule, &membership(1, 5), TriggerKind::Label, 4));
        assert!(!rule_matches(&rule.disabled(), &membership(1, 5), TriggerKind::Label, 3));
    }
}
