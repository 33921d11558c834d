//! Per-call-tree dispatch state: the work queue and the loop guard.
//!
//! An `AutomationContext` is created by whoever triggers the outermost
//! dispatch and is passed by reference through every collaborator call and
//! every re-entrant dispatch. Its scope is live while the outermost dispatch
//! drains; re-entrant calls only append to it. Two contexts never share state,
//! so concurrent dispatches for unrelated requests cannot see each other's
//! queue or seen-rule set.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use uuid::Uuid;

use crate::domain::models::{IssueRef, PendingAction, RuleId, UserId};

/// Unit of work in the dispatch queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchQueueEntry {
    pub action: PendingAction,
    pub issue: IssueRef,
    pub actor: UserId,
}

#[derive(Debug, Default)]
struct DispatchState {
    queue: VecDeque<DispatchQueueEntry>,
    seen_rule_ids: HashSet<RuleId>,
}

/// Result of offering a batch of actions to a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueOutcome {
    /// The scope was idle and this call opened it; the caller must drain.
    pub opened: bool,
    pub enqueued: usize,
    /// Actions dropped because their rule already fired in this call tree.
    pub suppressed: usize,
}

/// Queue plus seen-rule set for one dispatch call tree.
#[derive(Debug, Default)]
pub struct DispatchScope {
    state: Mutex<Option<DispatchState>>,
}

impl DispatchScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<DispatchState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a dispatch is currently draining this scope.
    pub fn is_live(&self) -> bool {
        self.lock().is_some()
    }

    /// Append actions, opening the scope if it is idle.
    ///
    /// A rule whose id was already enqueued in this call tree is skipped with
    /// a warning; this is the only thing that stops self-triggering cascades.
    pub fn enqueue(
        &self,
        actions: Vec<PendingAction>,
        issue: IssueRef,
        actor: UserId,
    ) -> EnqueueOutcome {
        let mut guard = self.lock();
        let opened = guard.is_none();
        let state = guard.get_or_insert_with(DispatchState::default);

        let mut enqueued = 0;
        let mut suppressed = 0;
        for action in actions {
            let rule_id = action.rule.id;
            if !state.seen_rule_ids.insert(rule_id) {
                tracing::warn!(
                    rule_id,
                    issue_id = issue.id,
                    "Automation loop detected, rule already dispatched in this call tree"
                );
                suppressed += 1;
                continue;
            }
            state.queue.push_back(DispatchQueueEntry {
                action,
                issue,
                actor,
            });
            enqueued += 1;
        }

        EnqueueOutcome {
            opened,
            enqueued,
            suppressed,
        }
    }

    /// Pop the head of the queue. `None` once the queue is exhausted.
    pub fn pop(&self) -> Option<DispatchQueueEntry> {
        self.lock().as_mut().and_then(|state| state.queue.pop_front())
    }

    /// Return the scope to idle, dropping any remaining entries.
    pub fn close(&self) {
        *self.lock() = None;
    }

    pub fn pending(&self) -> usize {
        self.lock().as_ref().map_or(0, |state| state.queue.len())
    }
}

/// Closes a scope when the draining dispatch finishes or unwinds.
pub(crate) struct ScopeGuard<'a> {
    scope: &'a DispatchScope,
}

impl<'a> ScopeGuard<'a> {
    pub(crate) fn new(scope: &'a DispatchScope) -> Self {
        Self { scope }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.scope.close();
    }
}

/// Request-scoped context threaded through one automation call tree.
#[derive(Debug)]
pub struct AutomationContext {
    correlation_id: Uuid,
    deadline: Option<Instant>,
    scope: DispatchScope,
}

impl AutomationContext {
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            deadline: None,
            scope: DispatchScope::new(),
        }
    }

    /// Attach a caller deadline. The engine never enforces it; collaborators
    /// receive it unchanged.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = id;
        self
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn scope(&self) -> &DispatchScope {
        &self.scope
    }
}

impl Default for AutomationContext {
    fn default() -> Self {
        Self::new()
    }
}
