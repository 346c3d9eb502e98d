//! A single run of a workflow, as an explicit state machine.
//!
//! ```text
//!   Idle ──step──▶ Running(i) ──step──▶ Running(i+1) ... ──▶ Done
//!                      │
//!                      ├── refresh/close ──▶ Terminal(action)
//!                      └── cancel ─────────▶ Cancelled
//! ```
//!
//! [`WorkflowRun::step`] executes exactly one action and never sleeps; pacing
//! and cancellation belong to whoever drives the run (see
//! [`crate::engine::WorkflowEngine`]), which lets a host with its own timer
//! drive steps directly.

use std::sync::Arc;

use clickflow_config::StorageMode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::ActionKind;
use crate::document::{ActionInstance, WorkflowDocument};
use crate::error::{Result, WorkflowError};
use crate::host::{ColorSource, Host};
use crate::state::{ContentItem, StateSink, TRIGGER_SCALE_STEP};
use crate::store::KeyValueStore;

/// Notice shown by an alert without a message.
pub const DEFAULT_ALERT_MESSAGE: &str = "Alert!";

/// Text shown by a show-text action without text.
pub const DEFAULT_SHOW_TEXT: &str = "No text provided";

/// Prompt used by prompt-and-show without a prompt.
pub const DEFAULT_PROMPT: &str = "Enter your input:";

/// Shown by get-storage for keys the store does not have.
pub const NOT_FOUND: &str = "Not found";

/// An action that ends the hosting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalAction {
    Refresh,
    Close,
}

impl std::fmt::Display for TerminalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalAction::Refresh => write!(f, "refresh"),
            TerminalAction::Close => write!(f, "close"),
        }
    }
}

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Created; state not yet reset.
    Idle,
    /// Next action to execute.
    Running { index: usize },
    /// A terminal action executed.
    Terminal(TerminalAction),
    /// Every action executed.
    Done,
    /// Stopped before the next dispatch.
    Cancelled,
}

impl RunPhase {
    /// Whether no further step can execute an action.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RunPhase::Terminal(_) | RunPhase::Done | RunPhase::Cancelled
        )
    }
}

/// Result of one [`WorkflowRun::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// An action executed; pause before the next step.
    Paced,
    /// A terminal action executed; the run is over.
    Terminal(TerminalAction),
    /// The run was already finished; nothing executed.
    Finished,
}

/// Non-fatal problem with a single action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "issue", content = "detail", rename_all = "snake_case")]
pub enum StepIssue {
    #[error("unknown action kind")]
    UnknownActionKind,

    #[error("malformed storage parameter '{0}'")]
    MalformedStorageParam(String),

    #[error("storage failed: {0}")]
    StorageFailed(String),
}

/// A [`StepIssue`] tied to the action that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDiagnostic {
    /// Position of the action in the document.
    pub index: usize,
    /// Kind as written in the document.
    pub kind: String,
    pub issue: StepIssue,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "action", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Terminated(TerminalAction),
    Cancelled,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Actions dispatched, including skipped unknown kinds.
    pub executed: usize,
    /// Pacing suspensions performed by the driver.
    pub pauses: usize,
    pub diagnostics: Vec<StepDiagnostic>,
}

/// Collaborators and policy a run executes against.
#[derive(Clone)]
pub struct RunContext {
    pub host: Arc<dyn Host>,
    pub store: Arc<dyn KeyValueStore>,
    pub colors: Arc<dyn ColorSource>,
    pub storage_mode: StorageMode,
}

/// One sequential execution of a document's actions.
pub struct WorkflowRun {
    actions: Vec<ActionInstance>,
    ctx: RunContext,
    phase: RunPhase,
    executed: usize,
    diagnostics: Vec<StepDiagnostic>,
}

impl WorkflowRun {
    /// Prepare a run. Fails with [`WorkflowError::NoActionsConfigured`] for an
    /// empty document; nothing is touched in that case.
    pub fn new(document: &WorkflowDocument, ctx: RunContext) -> Result<Self> {
        if !document.is_runnable() {
            return Err(WorkflowError::NoActionsConfigured);
        }
        Ok(Self {
            actions: document.actions.clone(),
            ctx,
            phase: RunPhase::Idle,
            executed: 0,
            diagnostics: Vec::new(),
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// Number of actions dispatched so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn diagnostics(&self) -> &[StepDiagnostic] {
        &self.diagnostics
    }

    /// Stop before the next dispatch. No effect on a finished run.
    pub fn cancel(&mut self) {
        if !self.phase.is_finished() {
            debug!("Run cancelled after {} action(s)", self.executed);
            self.phase = RunPhase::Cancelled;
        }
    }

    /// Execute the next action.
    ///
    /// The first step resets `state` to defaults before dispatching.
    pub fn step<S: StateSink + ?Sized>(&mut self, state: &mut S) -> StepResult {
        let index = match self.phase {
            RunPhase::Idle => {
                state.reset();
                0
            }
            RunPhase::Running { index } => index,
            _ => return StepResult::Finished,
        };

        let action = self.actions[index].clone();
        self.executed += 1;
        debug!(
            "Step {}/{}: {} ({})",
            index + 1,
            self.actions.len(),
            action.display_label,
            action.kind
        );

        if let Some(terminal) = self.dispatch(index, &action, state) {
            self.phase = RunPhase::Terminal(terminal);
            return StepResult::Terminal(terminal);
        }

        self.phase = if index + 1 < self.actions.len() {
            RunPhase::Running { index: index + 1 }
        } else {
            RunPhase::Done
        };
        StepResult::Paced
    }

    /// Summarize the run. An unfinished run reports as cancelled.
    pub fn into_outcome(self, pauses: usize) -> RunOutcome {
        let status = match self.phase {
            RunPhase::Done => RunStatus::Completed,
            RunPhase::Terminal(action) => RunStatus::Terminated(action),
            RunPhase::Idle | RunPhase::Running { .. } | RunPhase::Cancelled => {
                RunStatus::Cancelled
            }
        };
        RunOutcome {
            status,
            executed: self.executed,
            pauses,
            diagnostics: self.diagnostics,
        }
    }

    fn dispatch<S: StateSink + ?Sized>(
        &mut self,
        index: usize,
        action: &ActionInstance,
        state: &mut S,
    ) -> Option<TerminalAction> {
        let Some(kind) = action.action_kind() else {
            warn!("Unknown action: {}", action.kind);
            self.report(index, action, StepIssue::UnknownActionKind);
            return None;
        };

        match kind {
            ActionKind::Alert => {
                let message = action.non_empty_param().unwrap_or(DEFAULT_ALERT_MESSAGE);
                self.ctx.host.notify_user(message);
            }
            ActionKind::ShowText => {
                let text = action.non_empty_param().unwrap_or(DEFAULT_SHOW_TEXT);
                state.push_content(ContentItem::text(text));
            }
            ActionKind::ShowImage => match action.non_empty_param() {
                Some(url) => state.push_content(ContentItem::image(url)),
                None => debug!("Show image without a URL, skipping"),
            },
            ActionKind::Refresh => {
                self.ctx.host.reload_host();
                return Some(TerminalAction::Refresh);
            }
            ActionKind::SetStorage => self.set_storage(index, action, state),
            ActionKind::GetStorage => self.get_storage(index, action, state),
            ActionKind::GrowTrigger => state.grow_trigger(TRIGGER_SCALE_STEP),
            ActionKind::Close => {
                self.ctx.host.close_host();
                return Some(TerminalAction::Close);
            }
            ActionKind::PromptAndShow => {
                let prompt = action.non_empty_param().unwrap_or(DEFAULT_PROMPT);
                match self.ctx.host.prompt_user(prompt) {
                    Some(input) => state.push_content(ContentItem::text(input)),
                    None => debug!("Prompt cancelled"),
                }
            }
            ActionKind::RecolorTrigger => {
                let color = match action.non_empty_param() {
                    Some(color) => color.to_string(),
                    None => self.ctx.colors.next_color(),
                };
                state.set_trigger_color(color);
            }
            ActionKind::DisableTrigger => state.disable_trigger(),
        }
        None
    }

    fn set_storage<S: StateSink + ?Sized>(
        &mut self,
        index: usize,
        action: &ActionInstance,
        state: &mut S,
    ) {
        let param = action.param_or_empty();
        let Ok((key, value)) = parse_storage_param(param) else {
            self.malformed(index, action, param);
            return;
        };

        match self.ctx.store.set(key, value) {
            Ok(()) => state.push_content(ContentItem::text(format!("Saved: {key} = {value}"))),
            Err(e) => {
                warn!("Failed to store '{}': {}", key, e);
                self.report(index, action, StepIssue::StorageFailed(e.to_string()));
            }
        }
    }

    fn get_storage<S: StateSink + ?Sized>(
        &mut self,
        index: usize,
        action: &ActionInstance,
        state: &mut S,
    ) {
        let key = action.param_or_empty().trim();
        if key.is_empty() {
            self.malformed(index, action, action.param_or_empty());
        }

        match self.ctx.store.get(key) {
            Ok(value) => {
                let value = value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .unwrap_or(NOT_FOUND);
                state.push_content(ContentItem::text(format!("{key}: {value}")));
            }
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                self.report(index, action, StepIssue::StorageFailed(e.to_string()));
            }
        }
    }

    fn malformed(&mut self, index: usize, action: &ActionInstance, param: &str) {
        match self.ctx.storage_mode {
            StorageMode::Lenient => {
                debug!("Malformed storage parameter '{}'", param);
            }
            StorageMode::Strict => {
                warn!(
                    "Malformed storage parameter '{}' at position {}",
                    param,
                    index + 1
                );
                self.report(
                    index,
                    action,
                    StepIssue::MalformedStorageParam(param.to_string()),
                );
            }
        }
    }

    fn report(&mut self, index: usize, action: &ActionInstance, issue: StepIssue) {
        self.diagnostics.push(StepDiagnostic {
            index,
            kind: action.kind.clone(),
            issue,
        });
    }
}

/// Split a `key:value` storage parameter at the first `:`.
///
/// Key and value are trimmed and either may be empty; the value may itself
/// contain colons. Only a missing separator is rejected.
pub fn parse_storage_param(param: &str) -> Result<(&str, &str)> {
    let (key, value) = param
        .split_once(':')
        .ok_or_else(|| WorkflowError::MalformedStorageParam(param.to_string()))?;
    Ok((key.trim(), value.trim()))
}
