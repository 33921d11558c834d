//! Rule authoring language.
//!
//! Rules are written as four short strings:
//!
//! ```text
//! trigger: "move:Done"        action: "status:closed"
//! target:  "issue,pr"         context: "Backlog"
//! ```
//!
//! Names are resolved through a caller-supplied `RuleLookup`. Unknown
//! keywords are rejected; lookup errors are returned unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ActionKind, ActionTarget, AutomationRule, ProjectId, TriggerKind, XRefAction, ANY_COLUMN,
};
use crate::domain::ports::RuleLookup;

/// Unparsed rule text as entered by a project administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleText {
    pub trigger: String,
    pub action: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub context: String,
}

impl RuleText {
    pub fn new(trigger: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

fn split_keyword(text: &str) -> (&str, Option<&str>) {
    match text.trim().split_once(':') {
        Some((kind, arg)) => {
            let arg = arg.trim();
            (kind.trim(), (!arg.is_empty()).then_some(arg))
        }
        None => (text.trim(), None),
    }
}

fn required<'a>(keyword: &str, arg: Option<&'a str>) -> DomainResult<&'a str> {
    arg.ok_or_else(|| DomainError::InvalidRule(format!("'{keyword}' requires an argument")))
}

fn no_argument(keyword: &str, arg: Option<&str>) -> DomainResult<()> {
    match arg {
        Some(extra) => Err(DomainError::InvalidRule(format!(
            "'{keyword}' takes no argument, got '{extra}'"
        ))),
        None => Ok(()),
    }
}

/// Parse a trigger such as `label:bug` into its kind and payload.
pub async fn parse_trigger(
    text: &str,
    project_id: ProjectId,
    lookup: &dyn RuleLookup,
) -> DomainResult<(TriggerKind, i64)> {
    let (keyword, arg) = split_keyword(text);
    let kind = TriggerKind::from_str(keyword)
        .ok_or_else(|| DomainError::InvalidRule(format!("unknown trigger '{keyword}'")))?;

    let data = match kind {
        TriggerKind::Move => lookup.column_id(project_id, required(keyword, arg)?).await?,
        TriggerKind::StatusChange => lookup.status_code(required(keyword, arg)?).await?,
        TriggerKind::Label | TriggerKind::Unlabel => {
            lookup.label_id(project_id, required(keyword, arg)?).await?
        }
        TriggerKind::CrossReference => {
            let name = required(keyword, arg)?;
            XRefAction::from_str(name)
                .ok_or_else(|| {
                    DomainError::InvalidRule(format!("unknown cross-reference action '{name}'"))
                })?
                .code()
        }
        TriggerKind::Assign
        | TriggerKind::Unassign
        | TriggerKind::AssignToProject
        | TriggerKind::AssignReviewer
        | TriggerKind::UnassignReviewers
        | TriggerKind::Approve => {
            no_argument(keyword, arg)?;
            0
        }
    };

    Ok((kind, data))
}

/// Parse an action such as `move:Done` into its kind and payload.
pub async fn parse_action(
    text: &str,
    project_id: ProjectId,
    lookup: &dyn RuleLookup,
) -> DomainResult<(ActionKind, i64)> {
    let (keyword, arg) = split_keyword(text);
    let kind = ActionKind::from_str(keyword)
        .ok_or_else(|| DomainError::InvalidRule(format!("unknown action '{keyword}'")))?;

    let data = match kind {
        ActionKind::Move => lookup.column_id(project_id, required(keyword, arg)?).await?,
        ActionKind::StatusChange => lookup.status_code(required(keyword, arg)?).await?,
        ActionKind::Label | ActionKind::Unlabel => {
            lookup.label_id(project_id, required(keyword, arg)?).await?
        }
        ActionKind::AssignToProject => {
            no_argument(keyword, arg)?;
            project_id
        }
        ActionKind::NoOp
        | ActionKind::Assign
        | ActionKind::Unassign
        | ActionKind::AssignReviewer
        | ActionKind::UnassignReviewers
        | ActionKind::Approve => {
            no_argument(keyword, arg)?;
            0
        }
    };

    Ok((kind, data))
}

/// Parse a comma-separated target list. Empty or `default` yields `Default`.
pub fn parse_target(text: &str) -> DomainResult<ActionTarget> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("default") {
        return Ok(ActionTarget::Default);
    }

    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .try_fold(ActionTarget::Default, |acc, token| {
            let target = match token.to_lowercase().replace('-', "_").as_str() {
                "issue" | "issues" => ActionTarget::Issue,
                "pr" | "prs" | "pull" | "pull_request" => ActionTarget::PullRequest,
                _ => {
                    return Err(DomainError::InvalidRule(format!(
                        "unknown target '{token}'"
                    )))
                }
            };
            Ok(acc.union(target))
        })
}

/// Build an `AutomationRule` for `project_id` from its textual form.
///
/// The returned rule is unsaved (`id == 0`) and enabled.
pub async fn parse_rule(
    project_id: ProjectId,
    text: &RuleText,
    lookup: &dyn RuleLookup,
) -> DomainResult<AutomationRule> {
    let (trigger_kind, trigger_data) = parse_trigger(&text.trigger, project_id, lookup).await?;
    let (action_kind, action_data) = parse_action(&text.action, project_id, lookup).await?;
    let target = parse_target(&text.target)?;

    let context = text.context.trim();
    let column_id = if context.is_empty() {
        ANY_COLUMN
    } else {
        lookup.column_id(project_id, context).await?
    };

    Ok(
        AutomationRule::new(project_id, trigger_kind, trigger_data, action_kind, action_data)
            .with_column(column_id)
            .with_target(target),
    )
}

/// Render the trigger of a rule in `kind:data` form for display.
pub fn describe_trigger(rule: &AutomationRule) -> String {
    match rule.trigger_kind {
        TriggerKind::Move | TriggerKind::Label | TriggerKind::Unlabel => {
            format!("{}:{}", rule.trigger_kind.as_str(), rule.trigger_data)
        }
        TriggerKind::StatusChange => format!(
            "status:{}",
            if rule.trigger_data > 0 { "closed" } else { "open" }
        ),
        TriggerKind::CrossReference => format!(
            "xref:{}",
            XRefAction::from_code(rule.trigger_data).map_or("unknown", |a| a.as_str())
        ),
        kind => kind.as_str().to_string(),
    }
}

/// Render the action of a rule in `kind:data` form for display.
pub fn describe_action(rule: &AutomationRule) -> String {
    match rule.action_kind {
        ActionKind::Move | ActionKind::Label | ActionKind::Unlabel => {
            format!("{}:{}", rule.action_kind.as_str(), rule.action_data)
        }
        ActionKind::StatusChange => format!(
            "status:{}",
            if rule.action_data > 0 { "closed" } else { "open" }
        ),
        kind => kind.as_str().to_string(),
    }
}
