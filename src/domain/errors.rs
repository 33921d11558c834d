//! Domain errors for the projectflow automation engine.

use thiserror::Error;

/// Domain-level errors that can occur in the automation engine.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Automation rule not found: {0}")]
    RuleNotFound(i64),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Column '{name}' not found in project {project_id}")]
    ColumnNotFound { project_id: i64, name: String },

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(i64),

    #[error("Invalid automation rule: {0}")]
    InvalidRule(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
