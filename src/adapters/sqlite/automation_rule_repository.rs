//! SQLite implementation of the AutomationRuleRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::adapters::sqlite::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ActionKind, ActionTarget, AutomationRule, ColumnId, ProjectId, RuleId, TriggerKind,
};
use crate::domain::ports::AutomationRuleRepository;

const RULE_COLUMNS: &str = "id, enabled, project_id, column_id, trigger_kind, trigger_data, \
     action_kind, action_data, action_target, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteAutomationRuleRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AutomationRuleRow {
    id: i64,
    enabled: i32,
    project_id: i64,
    column_id: i64,
    trigger_kind: String,
    trigger_data: i64,
    action_kind: String,
    action_data: i64,
    action_target: i64,
    sort_order: i64,
    created_at: String,
    updated_at: String,
}

fn row_to_rule(row: AutomationRuleRow) -> DomainResult<AutomationRule> {
    let trigger_kind = TriggerKind::from_str(&row.trigger_kind).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown trigger kind: {}", row.trigger_kind))
    })?;
    let action_kind = ActionKind::from_str(&row.action_kind).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown action kind: {}", row.action_kind))
    })?;
    let action_target = ActionTarget::from_i64(row.action_target).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown action target: {}", row.action_target))
    })?;

    Ok(AutomationRule {
        id: row.id,
        enabled: row.enabled != 0,
        project_id: row.project_id,
        column_id: row.column_id,
        trigger_kind,
        trigger_data: row.trigger_data,
        action_kind,
        action_data: row.action_data,
        action_target,
        sort_order: row.sort_order,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

#[async_trait]
impl AutomationRuleRepository for SqliteAutomationRuleRepository {
    async fn create(&self, rule: &AutomationRule) -> DomainResult<AutomationRule> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO automation_rules
               (enabled, project_id, column_id, trigger_kind, trigger_data,
                action_kind, action_data, action_target, sort_order, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(i32::from(rule.enabled))
        .bind(rule.project_id)
        .bind(rule.column_id)
        .bind(rule.trigger_kind.as_str())
        .bind(rule.trigger_data)
        .bind(rule.action_kind.as_str())
        .bind(rule.action_data)
        .bind(rule.action_target.as_i64())
        .bind(rule.sort_order)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let mut created = rule.clone().with_id(result.last_insert_rowid());
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get(&self, id: RuleId) -> DomainResult<Option<AutomationRule>> {
        let row: Option<AutomationRuleRow> = sqlx::query_as(&format!(
            "SELECT {RULE_COLUMNS} FROM automation_rules WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_rule).transpose()
    }

    async fn update(&self, rule: &AutomationRule) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE automation_rules SET
               enabled = ?, project_id = ?, column_id = ?,
               trigger_kind = ?, trigger_data = ?,
               action_kind = ?, action_data = ?, action_target = ?,
               sort_order = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(i32::from(rule.enabled))
        .bind(rule.project_id)
        .bind(rule.column_id)
        .bind(rule.trigger_kind.as_str())
        .bind(rule.trigger_data)
        .bind(rule.action_kind.as_str())
        .bind(rule.action_data)
        .bind(rule.action_target.as_i64())
        .bind(rule.sort_order)
        .bind(Utc::now().to_rfc3339())
        .bind(rule.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RuleNotFound(rule.id));
        }
        Ok(())
    }

    async fn set_enabled(&self, id: RuleId, enabled: bool) -> DomainResult<bool> {
        let result =
            sqlx::query("UPDATE automation_rules SET enabled = ?, updated_at = ? WHERE id = ?")
                .bind(i32::from(enabled))
                .bind(Utc::now().to_rfc3339())
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: RuleId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM automation_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RuleNotFound(id));
        }
        Ok(())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> DomainResult<Vec<AutomationRule>> {
        let rows: Vec<AutomationRuleRow> = sqlx::query_as(&format!(
            "SELECT {RULE_COLUMNS} FROM automation_rules WHERE project_id = ? \
             ORDER BY sort_order, id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_rule).collect()
    }

    async fn find_by_project_ids(
        &self,
        project_ids: &[ProjectId],
        enabled_only: bool,
    ) -> DomainResult<Vec<AutomationRule>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {RULE_COLUMNS} FROM automation_rules WHERE project_id IN ("
        ));
        let mut ids = query.separated(", ");
        for id in project_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
        if enabled_only {
            query.push(" AND enabled = 1");
        }
        query.push(" ORDER BY sort_order, id");

        let rows: Vec<AutomationRuleRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_rule).collect()
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM automation_rules WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_column(&self, column_id: ColumnId) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM automation_rules WHERE column_id = ?")
            .bind(column_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
