//! SQLite implementation of the ProjectMembershipRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ColumnId, IssueId, ProjectId, ProjectMembership};
use crate::domain::ports::ProjectMembershipRepository;

#[derive(Clone)]
pub struct SqliteProjectMembershipRepository {
    pool: SqlitePool,
}

impl SqliteProjectMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an issue on a project column, moving it if already on the board.
    pub async fn place(
        &self,
        issue_id: IssueId,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO project_issues (issue_id, project_id, column_id)
               VALUES (?, ?, ?)
               ON CONFLICT (issue_id, project_id) DO UPDATE SET column_id = excluded.column_id"#,
        )
        .bind(issue_id)
        .bind(project_id)
        .bind(column_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove an issue from a project board.
    pub async fn remove(&self, issue_id: IssueId, project_id: ProjectId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM project_issues WHERE issue_id = ? AND project_id = ?")
            .bind(issue_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    issue_id: i64,
    project_id: i64,
    column_id: i64,
}

impl From<MembershipRow> for ProjectMembership {
    fn from(row: MembershipRow) -> Self {
        Self {
            issue_id: row.issue_id,
            project_id: row.project_id,
            column_id: row.column_id,
        }
    }
}

#[async_trait]
impl ProjectMembershipRepository for SqliteProjectMembershipRepository {
    async fn find_by_issue(&self, issue_id: IssueId) -> DomainResult<Vec<ProjectMembership>> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            "SELECT issue_id, project_id, column_id FROM project_issues \
             WHERE issue_id = ? ORDER BY project_id",
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectMembership::from).collect())
    }
}
