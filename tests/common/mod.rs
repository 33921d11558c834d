//! Common test utilities for integration tests
//!
//! `FakeTracker` is an in-memory issue tracker. It implements the issue,
//! membership and cross-reference ports, records every mutation, and
//! re-raises the matching notification into the attached event handler with
//! the caller's context, so cascades run end-to-end.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use std::time::Instant;

use async_trait::async_trait;
use uuid::Uuid;

use projectflow::adapters::sqlite::{create_migrated_test_pool, SqliteAutomationRuleRepository};
use projectflow::domain::errors::{DomainError, DomainResult};
use projectflow::domain::models::{
    AutomationConfig, AutomationRule, ColumnId, CrossReference, Issue, IssueEvent, IssueId,
    LabelId, ProjectId, ProjectMembership, UserId,
};
use projectflow::domain::ports::{
    AutomationRuleRepository, CrossReferenceResolver, IssueService, ProjectMembershipRepository,
};
use projectflow::services::{AutomationContext, AutomationEngine, AutomationEventHandler};

/// Kinds of tracker mutation, used for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    AddLabel,
    RemoveLabel,
    ChangeStatus,
    AddAssignee,
    ClearAssignees,
    RequestReview,
    ClearReviewRequest,
    LinkToProject,
    SubmitApproval,
    MoveToColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub issue_id: IssueId,
    pub actor: UserId,
}

/// Context values seen by one collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeenContext {
    pub correlation_id: Uuid,
    pub deadline: Option<Instant>,
}

#[derive(Default)]
struct TrackerState {
    issues: HashMap<IssueId, Issue>,
    references: HashMap<IssueId, Vec<CrossReference>>,
    calls: Vec<Call>,
    contexts: Vec<SeenContext>,
    failing: HashSet<CallKind>,
    membership_lookup_fails: bool,
}

#[derive(Default)]
pub struct FakeTracker {
    state: Mutex<TrackerState>,
    handler: OnceLock<Weak<AutomationEventHandler>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap()
    }

    /// Route re-raised notifications into `handler`.
    pub fn attach(&self, handler: &Arc<AutomationEventHandler>) {
        let _ = self.handler.set(Arc::downgrade(handler));
    }

    pub fn insert_issue(&self, issue: Issue) {
        self.lock().issues.insert(issue.id, issue);
    }

    /// Put an issue on a project column, replacing any earlier placement in
    /// that project.
    pub fn place(&self, issue_id: IssueId, project_id: ProjectId, column_id: ColumnId) {
        if let Some(issue) = self.lock().issues.get_mut(&issue_id) {
            set_column(issue, project_id, column_id);
        }
    }

    pub fn set_references(&self, pull_request_id: IssueId, references: Vec<CrossReference>) {
        self.lock().references.insert(pull_request_id, references);
    }

    /// Make every later call of `kind` fail.
    pub fn fail_on(&self, kind: CallKind) {
        self.lock().failing.insert(kind);
    }

    pub fn fail_membership_lookup(&self) {
        self.lock().membership_lookup_fails = true;
    }

    pub fn issue(&self, issue_id: IssueId) -> Issue {
        self.lock().issues[&issue_id].clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|c| c.kind == kind).count()
    }

    /// Contexts passed to every issue-service and resolver call, in call order.
    pub fn contexts(&self) -> Vec<SeenContext> {
        self.lock().contexts.clone()
    }

    fn observe(&self, ctx: &AutomationContext) {
        self.lock().contexts.push(SeenContext {
            correlation_id: ctx.correlation_id(),
            deadline: ctx.deadline(),
        });
    }

    /// Record the call, then apply `mutate` unless `kind` is set to fail.
    fn mutate(
        &self,
        ctx: &AutomationContext,
        kind: CallKind,
        issue_id: IssueId,
        actor: UserId,
        mutate: impl FnOnce(&mut Issue),
    ) -> DomainResult<Issue> {
        self.observe(ctx);
        let mut guard = self.lock();
        let state = &mut *guard;
        state.calls.push(Call {
            kind,
            issue_id,
            actor,
        });
        if state.failing.contains(&kind) {
            return Err(DomainError::ExecutionFailed(format!("{kind:?} rejected")));
        }
        let mut issue = state
            .issues
            .get(&issue_id)
            .cloned()
            .ok_or(DomainError::IssueNotFound(issue_id))?;
        mutate(&mut issue);
        state.issues.insert(issue_id, issue.clone());
        Ok(issue)
    }

    async fn raise(&self, ctx: &AutomationContext, event: IssueEvent) {
        let handler = self.handler.get().and_then(Weak::upgrade);
        if let Some(handler) = handler {
            handler.handle(ctx, &event).await;
        }
    }
}

#[async_trait]
impl IssueService for FakeTracker {
    async fn get_issue(&self, ctx: &AutomationContext, issue_id: IssueId) -> DomainResult<Issue> {
        self.observe(ctx);
        self.lock()
            .issues
            .get(&issue_id)
            .cloned()
            .ok_or(DomainError::IssueNotFound(issue_id))
    }

    async fn add_label(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        label_id: LabelId,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::AddLabel, issue_id, actor, |issue| {
            issue.label_ids.push(label_id);
        })?;
        self.raise(
            ctx,
            IssueEvent::LabelsChanged {
                issue: issue.to_ref(),
                actor,
                added: vec![label_id],
                removed: vec![],
            },
        )
        .await;
        Ok(())
    }

    async fn remove_label(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        label_id: LabelId,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::RemoveLabel, issue_id, actor, |issue| {
            issue.label_ids.retain(|l| *l != label_id);
        })?;
        self.raise(
            ctx,
            IssueEvent::LabelsChanged {
                issue: issue.to_ref(),
                actor,
                added: vec![],
                removed: vec![label_id],
            },
        )
        .await;
        Ok(())
    }

    async fn change_status(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        closed: bool,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::ChangeStatus, issue_id, actor, |issue| {
            issue.is_closed = closed;
        })?;
        self.raise(
            ctx,
            IssueEvent::StatusChanged {
                issue: issue.to_ref(),
                actor,
                is_closed: closed,
            },
        )
        .await;
        Ok(())
    }

    async fn add_assignee(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        assignee: UserId,
        actor: UserId,
    ) -> DomainResult<()> {
        self.mutate(ctx, CallKind::AddAssignee, issue_id, actor, |issue| {
            issue.assignee_ids.push(assignee);
        })?;
        Ok(())
    }

    async fn clear_assignees(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        actor: UserId,
    ) -> DomainResult<()> {
        self.mutate(ctx, CallKind::ClearAssignees, issue_id, actor, |issue| {
            issue.assignee_ids.clear();
        })?;
        Ok(())
    }

    async fn request_review(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        reviewer: UserId,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::RequestReview, issue_id, actor, |issue| {
            issue.requested_reviewer_ids.push(reviewer);
        })?;
        self.raise(
            ctx,
            IssueEvent::ReviewRequestChanged {
                pull_request: issue.to_ref(),
                actor,
                reviewer_id: reviewer,
                is_request: true,
                remaining_reviewers: issue.requested_reviewer_ids.len(),
            },
        )
        .await;
        Ok(())
    }

    async fn clear_review_request(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        reviewer: UserId,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::ClearReviewRequest, issue_id, actor, |issue| {
            issue.requested_reviewer_ids.retain(|r| *r != reviewer);
        })?;
        self.raise(
            ctx,
            IssueEvent::ReviewRequestChanged {
                pull_request: issue.to_ref(),
                actor,
                reviewer_id: reviewer,
                is_request: false,
                remaining_reviewers: issue.requested_reviewer_ids.len(),
            },
        )
        .await;
        Ok(())
    }

    async fn link_to_project(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        project_id: ProjectId,
        actor: UserId,
    ) -> DomainResult<()> {
        self.mutate(ctx, CallKind::LinkToProject, issue_id, actor, |issue| {
            set_column(issue, project_id, 0);
        })?;
        Ok(())
    }

    async fn submit_approval(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        actor: UserId,
    ) -> DomainResult<()> {
        let issue = self.mutate(ctx, CallKind::SubmitApproval, issue_id, actor, |issue| {
            issue.approver_ids.push(actor);
        })?;
        self.raise(
            ctx,
            IssueEvent::ReviewApproved {
                pull_request: issue.to_ref(),
                actor,
            },
        )
        .await;
        Ok(())
    }

    async fn move_to_column(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        project_id: ProjectId,
        column_id: ColumnId,
        actor: UserId,
    ) -> DomainResult<()> {
        let mut from_column_id = 0;
        let issue = self.mutate(ctx, CallKind::MoveToColumn, issue_id, actor, |issue| {
            from_column_id = issue.column_on(project_id).unwrap_or(0);
            set_column(issue, project_id, column_id);
        })?;
        self.raise(
            ctx,
            IssueEvent::IssuesMoved {
                project_id,
                target_column_id: column_id,
                actor,
                moves: vec![projectflow::domain::models::ColumnMove {
                    issue: issue.to_ref(),
                    from_column_id,
                }],
            },
        )
        .await;
        Ok(())
    }
}

#[async_trait]
impl ProjectMembershipRepository for FakeTracker {
    async fn find_by_issue(&self, issue_id: IssueId) -> DomainResult<Vec<ProjectMembership>> {
        let state = self.lock();
        if state.membership_lookup_fails {
            return Err(DomainError::DatabaseError("membership store offline".to_string()));
        }
        Ok(state
            .issues
            .get(&issue_id)
            .map(|issue| issue.memberships.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CrossReferenceResolver for FakeTracker {
    async fn resolve(
        &self,
        ctx: &AutomationContext,
        pull_request_id: IssueId,
    ) -> DomainResult<Vec<CrossReference>> {
        self.observe(ctx);
        Ok(self
            .lock()
            .references
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A wired engine over an in-memory SQLite rule store and a fake tracker.
pub struct Harness {
    pub rules: Arc<SqliteAutomationRuleRepository>,
    pub tracker: Arc<FakeTracker>,
    pub handler: Arc<AutomationEventHandler>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(AutomationConfig::default()).await
    }

    pub async fn with_config(config: AutomationConfig) -> Self {
        let pool = create_migrated_test_pool().await.unwrap();
        let rules = Arc::new(SqliteAutomationRuleRepository::new(pool));
        let tracker = Arc::new(FakeTracker::new());

        let engine = Arc::new(AutomationEngine::new(
            rules.clone(),
            tracker.clone(),
            tracker.clone(),
        ));
        let handler = Arc::new(
            AutomationEventHandler::new(engine, tracker.clone()).with_config(config),
        );
        tracker.attach(&handler);

        Self {
            rules,
            tracker,
            handler,
        }
    }

    pub async fn add_rule(&self, rule: AutomationRule) -> AutomationRule {
        self.rules.create(&rule).await.unwrap()
    }

    pub async fn handle(&self, event: IssueEvent) -> bool {
        self.handle_in(&AutomationContext::new(), event).await
    }

    pub async fn handle_in(&self, ctx: &AutomationContext, event: IssueEvent) -> bool {
        self.handler.handle(ctx, &event).await
    }
}

/// Put `issue` on `column_id` of `project_id`, replacing its earlier column
/// on that board.
fn set_column(issue: &mut Issue, project_id: ProjectId, column_id: ColumnId) {
    issue.memberships.retain(|m| m.project_id != project_id);
    issue.memberships.push(ProjectMembership {
        issue_id: issue.id,
        project_id,
        column_id,
    });
}

/// An open issue by `poster` on no board.
pub fn issue(id: IssueId, poster: UserId) -> Issue {
    Issue {
        id,
        poster_id: poster,
        ..Default::default()
    }
}

/// An open pull request by `poster` on no board.
pub fn pull_request(id: IssueId, poster: UserId) -> Issue {
    Issue {
        is_pull: true,
        ..issue(id, poster)
    }
}

/// Initialize a tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
