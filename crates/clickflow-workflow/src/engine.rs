//! Workflow engine: drives [`WorkflowRun`]s with pacing and cancellation.
//!
//! Provides `WorkflowEngine`, which owns the host collaborators and the pacing
//! policy, and guarantees at most one run in flight at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clickflow_config::{EngineSection, StorageMode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::document::WorkflowDocument;
use crate::error::{Result, WorkflowError};
use crate::host::{ColorSource, Host, RandomColors};
use crate::run::{RunContext, RunOutcome, RunStatus, StepResult, WorkflowRun};
use crate::state::StateSink;
use crate::store::KeyValueStore;

/// Configuration for the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pause after each non-terminal action.
    pub pacing: Duration,

    /// How malformed storage parameters are reported.
    pub storage_mode: StorageMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(clickflow_config::DEFAULT_PACING_MS),
            storage_mode: StorageMode::Lenient,
        }
    }
}

impl EngineConfig {
    /// Build from the `[engine]` config section.
    pub fn from_section(section: &EngineSection) -> Self {
        Self {
            pacing: Duration::from_millis(section.pacing_ms),
            storage_mode: section.storage_mode,
        }
    }
}

/// Clears the in-flight flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Executes workflow documents one action at a time.
pub struct WorkflowEngine {
    config: EngineConfig,
    host: Arc<dyn Host>,
    store: Arc<dyn KeyValueStore>,
    colors: Arc<dyn ColorSource>,
    in_flight: AtomicBool,
}

impl WorkflowEngine {
    /// Create an engine with random recolors.
    pub fn new(
        config: EngineConfig,
        host: Arc<dyn Host>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            host,
            store,
            colors: Arc::new(RandomColors),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the color source used by recolor actions without a color.
    pub fn with_colors(mut self, colors: Arc<dyn ColorSource>) -> Self {
        self.colors = colors;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `document` to completion against `state`.
    pub async fn run<S>(
        &self,
        document: Option<&WorkflowDocument>,
        state: &mut S,
    ) -> Result<RunOutcome>
    where
        S: StateSink + Send + ?Sized,
    {
        self.run_with_cancel(document, state, CancellationToken::new())
            .await
    }

    /// Run `document`, stopping before the next action once `cancel` fires.
    ///
    /// Fails with [`WorkflowError::NoActionsConfigured`] for an absent or empty
    /// document and with [`WorkflowError::RunInProgress`] while another run is
    /// in flight; `state` is untouched in both cases. Per-action problems never
    /// fail the run; they are collected in [`RunOutcome::diagnostics`].
    pub async fn run_with_cancel<S>(
        &self,
        document: Option<&WorkflowDocument>,
        state: &mut S,
        cancel: CancellationToken,
    ) -> Result<RunOutcome>
    where
        S: StateSink + Send + ?Sized,
    {
        let document = document
            .filter(|d| d.is_runnable())
            .ok_or(WorkflowError::NoActionsConfigured)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkflowError::RunInProgress);
        }
        let _guard = RunGuard(&self.in_flight);

        let mut run = WorkflowRun::new(document, self.context())?;
        info!(
            "Running workflow '{}' ({} action(s))",
            document.trigger_label,
            document.len()
        );

        let mut pauses = 0;
        loop {
            if cancel.is_cancelled() {
                run.cancel();
            }
            match run.step(state) {
                StepResult::Paced => {
                    pauses += 1;
                    tokio::select! {
                        _ = tokio::time::sleep(self.config.pacing) => {}
                        _ = cancel.cancelled() => {
                            debug!("Cancellation requested during pause");
                            run.cancel();
                        }
                    }
                }
                StepResult::Terminal(action) => {
                    debug!("Terminal action '{}' ends the run", action);
                    break;
                }
                StepResult::Finished => break,
            }
        }

        let outcome = run.into_outcome(pauses);
        match outcome.status {
            RunStatus::Completed => info!(
                "Workflow completed: {} action(s), {} diagnostic(s)",
                outcome.executed,
                outcome.diagnostics.len()
            ),
            RunStatus::Terminated(action) => {
                info!("Workflow ended by {} after {} action(s)", action, outcome.executed)
            }
            RunStatus::Cancelled => {
                info!("Workflow cancelled after {} action(s)", outcome.executed)
            }
        }
        Ok(outcome)
    }

    fn context(&self) -> RunContext {
        RunContext {
            host: self.host.clone(),
            store: self.store.clone(),
            colors: self.colors.clone(),
            storage_mode: self.config.storage_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.pacing, Duration::from_millis(300));
        assert_eq!(config.storage_mode, StorageMode::Lenient);
    }

    #[test]
    fn test_config_from_section() {
        let section = EngineSection {
            pacing_ms: 25,
            storage_mode: StorageMode::Strict,
        };
        let config = EngineConfig::from_section(&section);
        assert_eq!(config.pacing, Duration::from_millis(25));
        assert_eq!(config.storage_mode, StorageMode::Strict);
    }
}
