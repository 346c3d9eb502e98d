//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};
use clickflow_config::LoadedConfig;
use serde::Serialize;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration (default)
    Show,

    /// Show which config files are loaded and their precedence
    Which,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./clickflow.toml) instead of user config
        #[arg(long)]
        local: bool,
    },

    /// Show configuration file path
    Path,
}

/// Effective settings for JSON output.
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    data_dir: String,
    pacing_ms: u128,
    storage_mode: String,
    log_file: bool,
    sources: Vec<String>,
    warnings: Vec<String>,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context, loaded: &LoadedConfig) -> Result<()> {
    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => cmd_show(ctx, loaded),
        ConfigCommand::Which => cmd_which(loaded),
        ConfigCommand::Init { local } => cmd_init(local),
        ConfigCommand::Path => cmd_path(),
    }
}

fn cmd_show(ctx: &Context, loaded: &LoadedConfig) -> Result<()> {
    if ctx.json_output {
        let output = EffectiveConfig {
            data_dir: ctx.data_dir.display().to_string(),
            pacing_ms: ctx.engine.pacing.as_millis(),
            storage_mode: ctx.engine.storage_mode.to_string(),
            log_file: loaded.config.logging().file,
            sources: loaded
                .loaded_from()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            warnings: loaded.warnings.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("# Clickflow Configuration\n");

    // Sources
    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Engine:");
    println!("  pacing: {} ms", ctx.engine.pacing.as_millis());
    println!("  storage mode: {}", ctx.engine.storage_mode);
    println!();

    println!("Paths:");
    println!("  data dir: {}", ctx.data_dir.display());
    println!("  workflow: {}", ctx.workflow_path().display());
    println!("  storage:  {}", ctx.storage_path().display());
    println!();

    println!("Logging:");
    println!("  file: {}", loaded.config.logging().file);
    println!();

    // Warnings
    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        // Show raw TOML
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = loaded.config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

fn cmd_which(loaded: &LoadedConfig) -> Result<()> {
    println!("Config file search order (later overrides earlier):\n");

    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }

    println!();
    let loaded_count = loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found. Run 'clickflow config init' to create one.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

fn cmd_init(local: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("clickflow.toml")
    } else {
        clickflow_config::xdg_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
    };

    if !clickflow_config::write_template(&path)? {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }
    println!("✓ Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  clickflow config show    # verify configuration");

    Ok(())
}

fn cmd_path() -> Result<()> {
    if let Some(path) = clickflow_config::xdg_config_path() {
        println!("{}", path.display());
    } else {
        eprintln!("Could not determine config directory");
    }
    Ok(())
}
