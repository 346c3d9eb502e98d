//! Actions command - lists the action catalog.

use anyhow::Result;
use clap::Args;
use clickflow_workflow::catalog;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the actions command.
#[derive(Args, Debug)]
pub struct ActionsArgs {}

/// Catalog entry for JSON output.
#[derive(Debug, Serialize)]
struct ActionOutput {
    id: &'static str,
    alias: &'static str,
    label: &'static str,
    param_prompt: Option<&'static str>,
    terminal: bool,
}

/// Run the actions command.
pub async fn run(_args: ActionsArgs, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        let output: Vec<ActionOutput> = catalog::all()
            .iter()
            .map(|def| ActionOutput {
                id: def.kind.id(),
                alias: def.kind.alias(),
                label: def.label,
                param_prompt: def.param_prompt,
                terminal: def.kind.is_terminal(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}", style("Actions").bold());
    println!("{}", dim.apply_to("─".repeat(60)));
    for def in catalog::all() {
        println!(
            "  {:<20} {} {:<22} {}",
            def.kind.id(),
            dim.apply_to(format!("{:<16}", def.kind.alias())),
            def.label,
            dim.apply_to(def.param_prompt.unwrap_or("-"))
        );
    }
    println!();
    println!(
        "{}",
        dim.apply_to("Add one with: clickflow add <ID|ALIAS> [PARAM]")
    );
    Ok(())
}
