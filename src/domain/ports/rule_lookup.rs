//! Port for resolving names used in rule text to their integer encodings.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ColumnId, LabelId, ProjectId};

#[async_trait]
pub trait RuleLookup: Send + Sync {
    /// Resolve a column (board) name within a project.
    async fn column_id(&self, project_id: ProjectId, name: &str) -> DomainResult<ColumnId>;

    /// Resolve a label name visible to the project.
    async fn label_id(&self, project_id: ProjectId, name: &str) -> DomainResult<LabelId>;

    /// Resolve a status name to its trigger/action encoding.
    async fn status_code(&self, name: &str) -> DomainResult<i64> {
        match name.to_lowercase().as_str() {
            "open" | "opened" | "reopened" => Ok(0),
            "closed" | "close" => Ok(1),
            other => Err(DomainError::LookupFailed(format!("unknown status '{other}'"))),
        }
    }
}
