//! Repository port for automation rules.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AutomationRule, ColumnId, ProjectId, RuleId};

/// Repository for persisting and querying automation rules.
#[async_trait]
pub trait AutomationRuleRepository: Send + Sync {
    /// Insert a new rule and return it with its assigned id.
    async fn create(&self, rule: &AutomationRule) -> DomainResult<AutomationRule>;

    /// Get a rule by id.
    async fn get(&self, id: RuleId) -> DomainResult<Option<AutomationRule>>;

    /// Update an existing rule.
    async fn update(&self, rule: &AutomationRule) -> DomainResult<()>;

    /// Enable or disable a rule. Returns false when the rule does not exist.
    async fn set_enabled(&self, id: RuleId, enabled: bool) -> DomainResult<bool>;

    /// Delete a rule.
    async fn delete(&self, id: RuleId) -> DomainResult<()>;

    /// List all rules of one project, in presentation order.
    async fn list_by_project(&self, project_id: ProjectId) -> DomainResult<Vec<AutomationRule>>;

    /// Load the rules belonging to any of `project_ids`.
    async fn find_by_project_ids(
        &self,
        project_ids: &[ProjectId],
        enabled_only: bool,
    ) -> DomainResult<Vec<AutomationRule>>;

    /// Delete every rule of a project. Returns the number removed.
    async fn delete_by_project(&self, project_id: ProjectId) -> DomainResult<u64>;

    /// Delete every rule scoped to a column. Returns the number removed.
    async fn delete_by_column(&self, column_id: ColumnId) -> DomainResult<u64>;
}
