//! Port for looking up which project boards an issue sits on.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{IssueId, ProjectMembership};

#[async_trait]
pub trait ProjectMembershipRepository: Send + Sync {
    /// Live set of project/column rows for an issue. Empty when unassigned.
    async fn find_by_issue(&self, issue_id: IssueId) -> DomainResult<Vec<ProjectMembership>>;
}
