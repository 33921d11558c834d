//! Project board CLI commands: columns, labels and issue placement.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::adapters::sqlite::{
    Label, ProjectColumn, SqliteAutomationRuleRepository, SqliteBoardRepository,
    SqliteProjectMembershipRepository,
};
use crate::cli::commands::open_database;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, ActionOutput, CommandOutput};
use crate::domain::models::{Config, ANY_COLUMN};
use crate::domain::ports::{AutomationRuleRepository, RuleLookup};

#[derive(Args, Debug)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommands,
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Add a column to a project board
    AddColumn {
        #[arg(short, long)]
        project: i64,
        name: String,
        #[arg(long, default_value = "0")]
        sorting: i64,
    },
    /// List the columns of a project board
    Columns {
        #[arg(short, long)]
        project: i64,
    },
    /// Delete a column and every rule scoped to it
    DeleteColumn { id: i64 },
    /// Add a label, shared by all projects unless --project is given
    AddLabel {
        #[arg(short, long)]
        project: Option<i64>,
        name: String,
    },
    /// List the labels visible to a project
    Labels {
        #[arg(short, long)]
        project: i64,
    },
    /// Place an issue on a project column
    Place {
        #[arg(short, long)]
        issue: i64,
        #[arg(short, long)]
        project: i64,
        /// Column name; omit to place without a column
        #[arg(short, long)]
        column: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ColumnListOutput {
    pub columns: Vec<ProjectColumn>,
    pub total: usize,
}

impl CommandOutput for ColumnListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "sorting"]);
        for column in &self.columns {
            table.add_row(vec![
                column.id.to_string(),
                column.name.clone(),
                column.sorting.to_string(),
            ]);
        }
        render_list("column", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LabelListOutput {
    pub labels: Vec<Label>,
    pub total: usize,
}

impl CommandOutput for LabelListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "scope"]);
        for label in &self.labels {
            table.add_row(vec![
                label.id.to_string(),
                label.name.clone(),
                label
                    .project_id
                    .map_or_else(|| "shared".to_string(), |p| format!("project {p}")),
            ]);
        }
        render_list("label", &table, self.total)
    }
}

pub async fn execute(args: BoardArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let board = SqliteBoardRepository::new(pool.clone());

    match args.command {
        BoardCommands::AddColumn {
            project,
            name,
            sorting,
        } => {
            let column = board.create_column(project, &name, sorting).await?;
            output(
                &ActionOutput::ok(format!(
                    "Column '{}' added to project {project} (id {}).",
                    column.name, column.id
                )),
                json_mode,
            );
        }

        BoardCommands::Columns { project } => {
            let columns = board.list_columns(project).await?;
            let out = ColumnListOutput {
                total: columns.len(),
                columns,
            };
            output(&out, json_mode);
        }

        BoardCommands::DeleteColumn { id } => {
            let rules = SqliteAutomationRuleRepository::new(pool);
            let out = if board.delete_column(id).await? {
                let removed = rules.delete_by_column(id).await?;
                tracing::info!(column_id = id, rules_removed = removed, "Deleted project column");
                ActionOutput::ok(format!("Column {id} deleted with {removed} scoped rule(s)."))
            } else {
                ActionOutput::failed(format!("Column {id} not found."))
            };
            output(&out, json_mode);
        }

        BoardCommands::AddLabel { project, name } => {
            let label = board.create_label(project, &name).await?;
            output(
                &ActionOutput::ok(format!("Label '{}' added (id {}).", label.name, label.id)),
                json_mode,
            );
        }

        BoardCommands::Labels { project } => {
            let labels = board.list_labels(project).await?;
            let out = LabelListOutput {
                total: labels.len(),
                labels,
            };
            output(&out, json_mode);
        }

        BoardCommands::Place {
            issue,
            project,
            column,
        } => {
            let column_id = match column {
                Some(name) => board.column_id(project, &name).await?,
                None => ANY_COLUMN,
            };
            SqliteProjectMembershipRepository::new(pool)
                .place(issue, project, column_id)
                .await?;
            output(
                &ActionOutput::ok(format!(
                    "Issue {issue} placed on project {project} column {column_id}."
                )),
                json_mode,
            );
        }
    }

    Ok(())
}
