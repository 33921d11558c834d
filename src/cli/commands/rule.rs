//! Automation rule CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::adapters::sqlite::{SqliteAutomationRuleRepository, SqliteBoardRepository};
use crate::cli::commands::open_database;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, ActionOutput, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{AutomationRule, Config, RuleId, ANY_COLUMN};
use crate::domain::ports::AutomationRuleRepository;
use crate::services::action_target::effective_target;
use crate::services::rule_parser::{describe_action, describe_trigger, parse_rule, RuleText};

#[derive(Args, Debug)]
pub struct RuleArgs {
    #[command(subcommand)]
    pub command: RuleCommands,
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Add a rule to a project
    Add {
        /// Project the rule belongs to
        #[arg(short, long)]
        project: i64,

        /// Trigger, e.g. "move:Done" or "label:bug"
        #[arg(short, long)]
        trigger: String,

        /// Action, e.g. "status:closed" or "review_request"
        #[arg(short, long)]
        action: String,

        /// Issue kinds to act on: issue, pr, or both comma-separated
        #[arg(long, default_value = "")]
        target: String,

        /// Only fire for issues on this column
        #[arg(short, long, default_value = "")]
        context: String,

        /// Create the rule disabled
        #[arg(long)]
        disabled: bool,

        /// Position in listings
        #[arg(long, default_value = "0")]
        sort_order: i64,
    },
    /// List the rules of a project
    List {
        #[arg(short, long)]
        project: i64,

        /// Only show enabled rules
        #[arg(long)]
        enabled_only: bool,
    },
    /// Show rule details
    Show { id: RuleId },
    /// Enable a rule
    Enable { id: RuleId },
    /// Disable a rule
    Disable { id: RuleId },
    /// Delete a rule
    Delete { id: RuleId },
}

#[derive(Debug, serde::Serialize)]
pub struct RuleOutput {
    pub id: RuleId,
    pub project_id: i64,
    pub enabled: bool,
    pub trigger: String,
    pub action: String,
    pub target: String,
    pub column_id: Option<i64>,
    pub sort_order: i64,
    pub updated_at: String,
}

impl From<&AutomationRule> for RuleOutput {
    fn from(rule: &AutomationRule) -> Self {
        Self {
            id: rule.id,
            project_id: rule.project_id,
            enabled: rule.enabled,
            trigger: describe_trigger(rule),
            action: describe_action(rule),
            target: effective_target(rule).as_str().to_string(),
            column_id: (rule.column_id != ANY_COLUMN).then_some(rule.column_id),
            sort_order: rule.sort_order,
            updated_at: rule.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RuleListOutput {
    pub rules: Vec<RuleOutput>,
    pub total: usize,
}

impl CommandOutput for RuleListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "enabled", "trigger", "action", "target", "column"]);
        for rule in &self.rules {
            table.add_row(vec![
                rule.id.to_string(),
                if rule.enabled { "yes" } else { "no" }.to_string(),
                rule.trigger.clone(),
                rule.action.clone(),
                rule.target.clone(),
                rule.column_id.map_or_else(|| "any".to_string(), |c| c.to_string()),
            ]);
        }
        render_list("rule", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RuleDetailOutput {
    #[serde(flatten)]
    pub rule: RuleOutput,
    pub created_at: String,
}

impl CommandOutput for RuleDetailOutput {
    fn to_human(&self) -> String {
        let rule = &self.rule;
        [
            format!("Automation Rule #{}", rule.id),
            format!("Project: {}", rule.project_id),
            format!("Enabled: {}", rule.enabled),
            format!("Trigger: {}", rule.trigger),
            format!("Action: {}", rule.action),
            format!("Target: {}", rule.target),
            format!(
                "Column: {}",
                rule.column_id.map_or_else(|| "any".to_string(), |c| c.to_string())
            ),
            format!("Sort Order: {}", rule.sort_order),
            format!("Created: {}", self.created_at),
            format!("Updated: {}", rule.updated_at),
        ]
        .join("\n")
    }
}

pub async fn execute(args: RuleArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let repo = SqliteAutomationRuleRepository::new(pool.clone());

    match args.command {
        RuleCommands::Add {
            project,
            trigger,
            action,
            target,
            context,
            disabled,
            sort_order,
        } => {
            let lookup = SqliteBoardRepository::new(pool);
            let text = RuleText::new(trigger, action)
                .with_target(target)
                .with_context(context);
            let mut rule = parse_rule(project, &text, &lookup)
                .await
                .context("Failed to parse rule")?
                .with_sort_order(sort_order);
            if disabled {
                rule = rule.disabled();
            }

            let created = repo.create(&rule).await?;
            tracing::info!(rule_id = created.id, project_id = project, "Created automation rule");
            output(&detail(&created), json_mode);
        }

        RuleCommands::List {
            project,
            enabled_only,
        } => {
            let rules: Vec<AutomationRule> = repo
                .list_by_project(project)
                .await?
                .into_iter()
                .filter(|r| !enabled_only || r.enabled)
                .collect();

            let out = RuleListOutput {
                total: rules.len(),
                rules: rules.iter().map(RuleOutput::from).collect(),
            };
            output(&out, json_mode);
        }

        RuleCommands::Show { id } => {
            let rule = repo.get(id).await?.ok_or(DomainError::RuleNotFound(id))?;
            output(&detail(&rule), json_mode);
        }

        RuleCommands::Enable { id } => toggle(&repo, id, true, json_mode).await?,
        RuleCommands::Disable { id } => toggle(&repo, id, false, json_mode).await?,

        RuleCommands::Delete { id } => {
            repo.delete(id).await?;
            output(&ActionOutput::ok(format!("Rule {id} deleted.")), json_mode);
        }
    }

    Ok(())
}

async fn toggle(
    repo: &SqliteAutomationRuleRepository,
    id: RuleId,
    enabled: bool,
    json_mode: bool,
) -> Result<()> {
    let state = if enabled { "enabled" } else { "disabled" };
    let out = if repo.set_enabled(id, enabled).await? {
        tracing::info!(rule_id = id, enabled, "Toggled automation rule");
        ActionOutput::ok(format!("Rule {id} {state}."))
    } else {
        ActionOutput::failed(format!("Rule {id} not found."))
    };
    output(&out, json_mode);
    Ok(())
}

fn detail(rule: &AutomationRule) -> RuleDetailOutput {
    RuleDetailOutput {
        rule: RuleOutput::from(rule),
        created_at: rule.created_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ActionKind, ActionTarget, TriggerKind};

    #[test]
    fn test_rule_output_describes_rule() {
        let rule = AutomationRule::new(2, TriggerKind::Move, 11, ActionKind::StatusChange, 1)
            .with_id(9)
            .with_column(4);
        let out = RuleOutput::from(&rule);
        assert_eq!(out.trigger, "move:11");
        assert_eq!(out.action, "status:closed");
        assert_eq!(out.target, "both");
        assert_eq!(out.column_id, Some(4));
    }

    #[test]
    fn test_review_rule_targets_pull_requests() {
        let rule = AutomationRule::new(2, TriggerKind::Label, 1, ActionKind::Approve, 0);
        assert_eq!(RuleOutput::from(&rule).target, "pull_request");

        let rule = rule.with_target(ActionTarget::Issue);
        assert_eq!(RuleOutput::from(&rule).target, "issue");
    }
}
