//! Run command - executes the saved workflow in the terminal.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use clickflow_workflow::{
    ContentItem, ContentKind, ExecutionState, RunOutcome, RunStatus, StateHandle, StateSink,
    TerminalAction, WorkflowEngine, WorkflowError,
};
use console::{Style, style};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::Context;
use crate::host::TerminalHost;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Answer for the next prompt instead of reading stdin (repeatable)
    #[arg(long = "answer", value_name = "TEXT")]
    pub answers: Vec<String>,

    /// Don't wait for Enter after alerts
    #[arg(long)]
    pub no_wait: bool,
}

/// Run report for JSON output.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    trigger_label: &'a str,
    outcome: &'a RunOutcome,
    state: &'a ExecutionState,
}

/// State sink that prints content as the engine appends it.
struct LiveDisplay {
    state: StateHandle,
    echo: bool,
}

impl StateSink for LiveDisplay {
    fn reset(&mut self) {
        self.state.reset();
    }

    fn push_content(&mut self, item: ContentItem) {
        if self.echo {
            print_item(&item);
        }
        self.state.push_content(item);
    }

    fn grow_trigger(&mut self, delta: f64) {
        self.state.grow_trigger(delta);
    }

    fn set_trigger_color(&mut self, color: String) {
        self.state.set_trigger_color(color);
    }

    fn disable_trigger(&mut self) {
        self.state.disable_trigger();
    }
}

fn print_item(item: &ContentItem) {
    let dim = Style::new().dim();
    match item.kind {
        ContentKind::Text => println!("  {}", item.payload),
        ContentKind::Image => println!("  {} {}", dim.apply_to("[image]"), item.payload),
    }
}

/// Run the run command.
pub async fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_document()?;
    let store = Arc::new(ctx.open_storage()?);
    let host = Arc::new(TerminalHost::new(args.answers, !args.no_wait));
    let engine = WorkflowEngine::new(ctx.engine.clone(), host.clone(), store);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let dim = Style::new().dim();
    if !ctx.json_output
        && let Some(doc) = document.as_ref().filter(|d| d.is_runnable())
    {
        println!(
            "{} {} {}",
            style("▶").green(),
            style(&doc.trigger_label).bold(),
            dim.apply_to(format!("({} action(s))", doc.len()))
        );
    }

    let mut display = LiveDisplay {
        state: StateHandle::new(),
        echo: !ctx.json_output,
    };
    let outcome = match engine
        .run_with_cancel(document.as_ref(), &mut display, cancel)
        .await
    {
        Ok(outcome) => outcome,
        Err(WorkflowError::NoActionsConfigured) => {
            bail!("No actions configured. Add one with: clickflow add <KIND> [PARAM]")
        }
        Err(e) => return Err(e.into()),
    };
    let state = display.state.snapshot();

    if ctx.json_output {
        let report = RunReport {
            trigger_label: document
                .as_ref()
                .map(|d| d.trigger_label.as_str())
                .unwrap_or_default(),
            outcome: &outcome,
            state: &state,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&outcome, &state, host.requested());
    Ok(())
}

fn print_summary(
    outcome: &RunOutcome,
    state: &ExecutionState,
    requested: Option<TerminalAction>,
) {
    let dim = Style::new().dim();
    let green = Style::new().green();
    let yellow = Style::new().yellow();

    println!();
    match outcome.status {
        RunStatus::Completed => println!(
            "{} Completed: {} action(s), {} pause(s)",
            green.apply_to("✓"),
            outcome.executed,
            outcome.pauses
        ),
        RunStatus::Terminated(action) => println!(
            "{} Ended by {} after {} action(s)",
            green.apply_to("■"),
            action,
            outcome.executed
        ),
        RunStatus::Cancelled => println!(
            "{} Cancelled after {} action(s)",
            yellow.apply_to("■"),
            outcome.executed
        ),
    }

    match requested {
        Some(TerminalAction::Refresh) => println!("  {}", dim.apply_to("Host reload requested")),
        Some(TerminalAction::Close) => println!("  {}", dim.apply_to("Host close requested")),
        None => {}
    }

    println!(
        "  {} scale {:.1}, color {}, {}",
        dim.apply_to("Trigger:"),
        state.trigger_scale,
        state.trigger_color,
        if state.trigger_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    for diagnostic in &outcome.diagnostics {
        println!(
            "  {} #{} {}: {}",
            yellow.apply_to("⚠"),
            diagnostic.index + 1,
            diagnostic.kind,
            diagnostic.issue
        );
    }
}
