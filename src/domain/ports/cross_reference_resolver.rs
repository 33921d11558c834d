//! Port for resolving the issues a pull request references.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CrossReference, IssueId};
use crate::services::dispatch::AutomationContext;

#[async_trait]
pub trait CrossReferenceResolver: Send + Sync {
    /// Resolve the cross-references in a pull request's title and body.
    async fn resolve(
        &self,
        ctx: &AutomationContext,
        pull_request_id: IssueId,
    ) -> DomainResult<Vec<CrossReference>>;
}
