//! SQLite storage for project columns and labels, and the name lookups the
//! rule parser resolves against them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ColumnId, LabelId, ProjectId};
use crate::domain::ports::RuleLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectColumn {
    pub id: ColumnId,
    pub project_id: ProjectId,
    pub name: String,
    pub sorting: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: LabelId,
    /// `None` for labels shared by every project.
    pub project_id: Option<ProjectId>,
    pub name: String,
}

#[derive(Clone)]
pub struct SqliteBoardRepository {
    pool: SqlitePool,
}

impl SqliteBoardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_column(
        &self,
        project_id: ProjectId,
        name: &str,
        sorting: i64,
    ) -> DomainResult<ProjectColumn> {
        let result =
            sqlx::query("INSERT INTO project_columns (project_id, name, sorting) VALUES (?, ?, ?)")
                .bind(project_id)
                .bind(name)
                .bind(sorting)
                .execute(&self.pool)
                .await?;

        Ok(ProjectColumn {
            id: result.last_insert_rowid(),
            project_id,
            name: name.to_string(),
            sorting,
        })
    }

    pub async fn list_columns(&self, project_id: ProjectId) -> DomainResult<Vec<ProjectColumn>> {
        let columns: Vec<ProjectColumn> = sqlx::query_as(
            "SELECT id, project_id, name, sorting FROM project_columns \
             WHERE project_id = ? ORDER BY sorting, id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }

    /// Delete a column. Rules scoped to it are left for the caller to remove.
    pub async fn delete_column(&self, column_id: ColumnId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM project_columns WHERE id = ?")
            .bind(column_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_label(
        &self,
        project_id: Option<ProjectId>,
        name: &str,
    ) -> DomainResult<Label> {
        let result = sqlx::query("INSERT INTO labels (project_id, name) VALUES (?, ?)")
            .bind(project_id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Label {
            id: result.last_insert_rowid(),
            project_id,
            name: name.to_string(),
        })
    }

    /// Labels visible to a project: its own plus the shared ones.
    pub async fn list_labels(&self, project_id: ProjectId) -> DomainResult<Vec<Label>> {
        let labels: Vec<Label> = sqlx::query_as(
            "SELECT id, project_id, name FROM labels \
             WHERE project_id = ? OR project_id IS NULL ORDER BY name, id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(labels)
    }
}

#[async_trait]
impl RuleLookup for SqliteBoardRepository {
    async fn column_id(&self, project_id: ProjectId, name: &str) -> DomainResult<ColumnId> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM project_columns WHERE project_id = ? AND name = ?")
                .bind(project_id)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id,)| id).ok_or_else(|| DomainError::ColumnNotFound {
            project_id,
            name: name.to_string(),
        })
    }

    async fn label_id(&self, project_id: ProjectId, name: &str) -> DomainResult<LabelId> {
        // Project labels shadow shared labels of the same name.
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM labels WHERE name = ? AND (project_id = ? OR project_id IS NULL) \
             ORDER BY project_id IS NULL LIMIT 1",
        )
        .bind(name)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id,)| id)
            .ok_or_else(|| DomainError::LabelNotFound(name.to_string()))
    }
}
