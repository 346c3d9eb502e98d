//! Clickflow - build and run single-trigger action workflows
//!
//! Main entry point for the Clickflow CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod host;

use commands::{actions, config, edit, run, show, storage};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Clickflow - build and run single-trigger action workflows
#[derive(Parser)]
#[command(name = "clickflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the saved workflow and key-value store
    #[arg(long, global = true, env = "CLICKFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Report malformed set-storage parameters instead of skipping them silently
    #[arg(long, global = true)]
    pub strict_storage: bool,

    /// Pause between actions, in milliseconds
    #[arg(long, global = true)]
    pub pacing_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available action kinds
    Actions(actions::ActionsArgs),

    /// Show the saved workflow
    Show(show::ShowArgs),

    /// Set the trigger label
    Label(edit::LabelArgs),

    /// Append an action to the workflow
    Add(edit::AddArgs),

    /// Remove the action at a position
    Remove(edit::RemoveArgs),

    /// Move an action to another position
    Move(edit::MoveArgs),

    /// Remove every action and the label
    Clear(edit::ClearArgs),

    /// Run the saved workflow
    Run(run::RunArgs),

    /// Inspect the key-value store used by storage actions
    Storage(storage::StorageArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = clickflow_config::load_config(None)?;

    // Initialize tracing: console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "clickflow=debug,clickflow_workflow=debug,clickflow_config=debug,info"
    } else {
        "clickflow=info,clickflow_workflow=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    // The guard flushes the file writer on drop, so it lives until main returns
    let (file_layer, _guard) = if loaded.config.logging().file {
        let log_dir = clickflow_config::xdg_config_dir()
            .map(|d| d.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"));
        let file_appender = tracing_appender::rolling::daily(&log_dir, "clickflow.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(tracing_subscriber::EnvFilter::new(
                "clickflow=trace,clickflow_workflow=trace,clickflow_config=trace,info",
            ));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    // Create context for commands
    let ctx = commands::Context::new(
        &loaded.config,
        commands::Overrides {
            data_dir: cli.data_dir,
            strict_storage: cli.strict_storage,
            pacing_ms: cli.pacing_ms,
        },
        cli.json,
        cli.verbose,
    );

    // Dispatch to command handlers
    match cli.command {
        Commands::Actions(args) => actions::run(args, &ctx).await,
        Commands::Show(args) => show::run(args, &ctx).await,
        Commands::Label(args) => edit::label(args, &ctx).await,
        Commands::Add(args) => edit::add(args, &ctx).await,
        Commands::Remove(args) => edit::remove(args, &ctx).await,
        Commands::Move(args) => edit::move_action(args, &ctx).await,
        Commands::Clear(args) => edit::clear(args, &ctx).await,
        Commands::Run(args) => run::run(args, &ctx).await,
        Commands::Storage(args) => storage::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx, &loaded).await,
    }
}
