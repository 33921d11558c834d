//! Event adapters: translate issue notifications into match + dispatch calls.
//!
//! Matching failures abort the event (no partial matching) and are logged;
//! they are never raised to the notifier.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AutomationConfig, ColumnId, ColumnMove, IssueEvent, IssueRef, LabelId, PendingAction,
    TriggerKind, UserId, XRefAction,
};
use crate::domain::ports::CrossReferenceResolver;
use crate::services::automation_engine::AutomationEngine;
use crate::services::dispatch::AutomationContext;

pub struct AutomationEventHandler {
    engine: Arc<AutomationEngine>,
    cross_references: Arc<dyn CrossReferenceResolver>,
    config: AutomationConfig,
}

impl AutomationEventHandler {
    pub fn new(
        engine: Arc<AutomationEngine>,
        cross_references: Arc<dyn CrossReferenceResolver>,
    ) -> Self {
        Self {
            engine,
            cross_references,
            config: AutomationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AutomationConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle one notification. Returns whether any automation mutated state.
    pub async fn handle(&self, ctx: &AutomationContext, event: &IssueEvent) -> bool {
        if !self.config.enabled {
            tracing::debug!(event = event.variant_name(), "Automation disabled, ignoring event");
            return false;
        }

        match self.try_handle(ctx, event).await {
            Ok(changed) => changed,
            Err(e) => {
                tracing::error!(
                    event = event.variant_name(),
                    issue_id = ?event.issue_id(),
                    error = %e,
                    "Automation matching failed, event dropped"
                );
                false
            }
        }
    }

    async fn try_handle(&self, ctx: &AutomationContext, event: &IssueEvent) -> DomainResult<bool> {
        match event {
            IssueEvent::StatusChanged {
                issue,
                actor,
                is_closed,
            } => self.on_status_changed(ctx, *issue, *actor, *is_closed).await,
            IssueEvent::LabelsChanged {
                issue,
                actor,
                added,
                removed,
            } => self.on_labels_changed(ctx, *issue, *actor, added, removed).await,
            IssueEvent::ReviewRequestChanged {
                pull_request,
                actor,
                is_request,
                remaining_reviewers,
                ..
            } => {
                self.on_review_request_changed(
                    ctx,
                    *pull_request,
                    *actor,
                    *is_request,
                    *remaining_reviewers,
                )
                .await
            }
            IssueEvent::ReviewApproved {
                pull_request,
                actor,
            } => self.on_review_approved(ctx, *pull_request, *actor).await,
            IssueEvent::PullRequestOpened {
                pull_request,
                actor,
            } => self.on_pull_request_opened(ctx, *pull_request, *actor).await,
            IssueEvent::IssuesMoved {
                target_column_id,
                actor,
                moves,
                ..
            } => self.on_issues_moved(ctx, *target_column_id, *actor, moves).await,
        }
    }

    async fn fire(
        &self,
        ctx: &AutomationContext,
        issue: IssueRef,
        actor: UserId,
        trigger_kind: TriggerKind,
        trigger_data: i64,
    ) -> DomainResult<bool> {
        let actions = self
            .engine
            .find_matches(issue.id, trigger_kind, trigger_data)
            .await?;
        Ok(self.engine.dispatch(ctx, actions, issue, actor).await)
    }

    pub async fn on_status_changed(
        &self,
        ctx: &AutomationContext,
        issue: IssueRef,
        actor: UserId,
        is_closed: bool,
    ) -> DomainResult<bool> {
        self.fire(ctx, issue, actor, TriggerKind::StatusChange, i64::from(is_closed))
            .await
    }

    /// All added and removed labels are matched first and dispatched together.
    pub async fn on_labels_changed(
        &self,
        ctx: &AutomationContext,
        issue: IssueRef,
        actor: UserId,
        added: &[LabelId],
        removed: &[LabelId],
    ) -> DomainResult<bool> {
        let mut actions: Vec<PendingAction> = Vec::new();
        for label_id in added {
            actions.extend(
                self.engine
                    .find_matches(issue.id, TriggerKind::Label, *label_id)
                    .await?,
            );
        }
        for label_id in removed {
            actions.extend(
                self.engine
                    .find_matches(issue.id, TriggerKind::Unlabel, *label_id)
                    .await?,
            );
        }
        Ok(self.engine.dispatch(ctx, actions, issue, actor).await)
    }

    /// Fires only on the first request (0→1) or the last removal (1→0).
    pub async fn on_review_request_changed(
        &self,
        ctx: &AutomationContext,
        pull_request: IssueRef,
        actor: UserId,
        is_request: bool,
        remaining_reviewers: usize,
    ) -> DomainResult<bool> {
        let trigger_kind = match (is_request, remaining_reviewers) {
            (true, 1) => TriggerKind::AssignReviewer,
            (false, 0) => TriggerKind::UnassignReviewers,
            _ => return Ok(false),
        };
        self.fire(ctx, pull_request, actor, trigger_kind, 0).await
    }

    /// Fires for the pull request and for every issue it would close.
    pub async fn on_review_approved(
        &self,
        ctx: &AutomationContext,
        pull_request: IssueRef,
        actor: UserId,
    ) -> DomainResult<bool> {
        let mut changed = self
            .fire(ctx, pull_request, actor, TriggerKind::Approve, 0)
            .await?;

        let references = self.cross_references.resolve(ctx, pull_request.id).await?;
        for reference in references
            .iter()
            .filter(|r| r.action == XRefAction::Closes)
        {
            changed |= self
                .fire(
                    ctx,
                    IssueRef::issue(reference.issue_id),
                    actor,
                    TriggerKind::Approve,
                    0,
                )
                .await?;
        }
        Ok(changed)
    }

    /// For each reference, fires against the referenced issue and the pull
    /// request itself.
    pub async fn on_pull_request_opened(
        &self,
        ctx: &AutomationContext,
        pull_request: IssueRef,
        actor: UserId,
    ) -> DomainResult<bool> {
        let references = self.cross_references.resolve(ctx, pull_request.id).await?;
        let mut changed = false;
        for reference in references {
            let code = reference.action.code();
            changed |= self
                .fire(
                    ctx,
                    IssueRef::issue(reference.issue_id),
                    actor,
                    TriggerKind::CrossReference,
                    code,
                )
                .await?;
            changed |= self
                .fire(ctx, pull_request, actor, TriggerKind::CrossReference, code)
                .await?;
        }
        Ok(changed)
    }

    /// Fires once per issue that actually changes column.
    pub async fn on_issues_moved(
        &self,
        ctx: &AutomationContext,
        target_column_id: ColumnId,
        actor: UserId,
        moves: &[ColumnMove],
    ) -> DomainResult<bool> {
        let mut changed = false;
        for column_move in moves
            .iter()
            .filter(|m| m.from_column_id != target_column_id)
        {
            changed |= self
                .fire(
                    ctx,
                    column_move.issue,
                    actor,
                    TriggerKind::Move,
                    target_column_id,
                )
                .await?;
        }
        Ok(changed)
    }
}
