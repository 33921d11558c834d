//! Automation engine façade: trigger matching plus queue-driven dispatch.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::errors::DomainResult;
use crate::domain::models::{IssueId, IssueRef, PendingAction, TriggerKind, UserId};
use crate::domain::ports::{AutomationRuleRepository, IssueService, ProjectMembershipRepository};
use crate::services::action_interpreter::ActionInterpreter;
use crate::services::action_target::should_run_for;
use crate::services::dispatch::{AutomationContext, ScopeGuard};
use crate::services::trigger_matcher::TriggerMatcher;

pub struct AutomationEngine {
    matcher: TriggerMatcher,
    interpreter: ActionInterpreter,
}

impl AutomationEngine {
    pub fn new(
        rules: Arc<dyn AutomationRuleRepository>,
        memberships: Arc<dyn ProjectMembershipRepository>,
        issues: Arc<dyn IssueService>,
    ) -> Self {
        Self {
            matcher: TriggerMatcher::new(rules, memberships),
            interpreter: ActionInterpreter::new(issues),
        }
    }

    pub async fn find_matches(
        &self,
        issue_id: IssueId,
        trigger_kind: TriggerKind,
        trigger_data: i64,
    ) -> DomainResult<Vec<PendingAction>> {
        self.matcher
            .find_matches(issue_id, trigger_kind, trigger_data)
            .await
    }

    /// Queue `actions` against `issue` and, if this is the outermost call for
    /// `ctx`, drain the queue until it is empty.
    ///
    /// Re-entrant calls (made while `ctx` is already draining) only append
    /// and return `false`. The outermost call returns whether any action
    /// mutated state; treat it as a hint to refresh cached issue state, not
    /// as a transactional result.
    pub async fn dispatch(
        &self,
        ctx: &AutomationContext,
        actions: Vec<PendingAction>,
        issue: IssueRef,
        actor: UserId,
    ) -> bool {
        let scope = ctx.scope();
        let outcome = scope.enqueue(actions, issue, actor);
        if !outcome.opened {
            tracing::debug!(
                issue_id = issue.id,
                enqueued = outcome.enqueued,
                suppressed = outcome.suppressed,
                "Appended to in-progress automation dispatch"
            );
            return false;
        }

        let span = tracing::info_span!(
            "automation_dispatch",
            correlation_id = %ctx.correlation_id(),
            issue_id = issue.id
        );
        self.drain(ctx).instrument(span).await
    }

    async fn drain(&self, ctx: &AutomationContext) -> bool {
        let scope = ctx.scope();
        let _guard = ScopeGuard::new(scope);
        let mut changed = false;

        while let Some(entry) = scope.pop() {
            let rule = &entry.action.rule;
            if !should_run_for(rule, entry.issue.kind) {
                tracing::debug!(
                    rule_id = rule.id,
                    issue_id = entry.issue.id,
                    kind = entry.issue.kind.as_str(),
                    "Rule does not target this issue kind"
                );
                continue;
            }

            match self.interpreter.apply(ctx, &entry).await {
                Ok(mutated) => changed |= mutated,
                Err(e) => {
                    tracing::warn!(
                        rule_id = rule.id,
                        issue_id = entry.issue.id,
                        action = entry.action.action.kind().as_str(),
                        error = %e,
                        "Automation action failed"
                    );
                }
            }
        }

        changed
    }
}
