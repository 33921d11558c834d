//! Port for the issue and pull request mutation services.
//!
//! Every mutation is a collaborator-owned unit of work. Implementations raise
//! their own downstream notifications, which may re-enter the engine with the
//! same `AutomationContext`.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ColumnId, Issue, IssueId, LabelId, ProjectId, UserId};
use crate::services::dispatch::AutomationContext;

#[async_trait]
pub trait IssueService: Send + Sync {
    /// Load a fresh snapshot of an issue, including its board memberships.
    async fn get_issue(&self, ctx: &AutomationContext, issue_id: IssueId) -> DomainResult<Issue>;

    async fn add_label(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        label_id: LabelId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn remove_label(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        label_id: LabelId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn change_status(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        closed: bool,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn add_assignee(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        assignee: UserId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn clear_assignees(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn request_review(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        reviewer: UserId,
        actor: UserId,
    ) -> DomainResult<()>;

    /// Remove one pending review request.
    async fn clear_review_request(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        reviewer: UserId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn link_to_project(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        project_id: ProjectId,
        actor: UserId,
    ) -> DomainResult<()>;

    /// Submit an approving review as `actor`.
    async fn submit_approval(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        actor: UserId,
    ) -> DomainResult<()>;

    async fn move_to_column(
        &self,
        ctx: &AutomationContext,
        issue_id: IssueId,
        project_id: ProjectId,
        column_id: ColumnId,
        actor: UserId,
    ) -> DomainResult<()>;
}
