//! Show command - prints the saved workflow.

use anyhow::Result;
use clap::Args;
use clickflow_workflow::WorkflowDocument;
use console::{Style, style};

use super::Context;

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Include instance ids
    #[arg(long)]
    pub ids: bool,
}

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_or_default()?;

    if ctx.json_output {
        println!("{}", document.to_json()?);
        return Ok(());
    }

    print_document(&document, args.ids || ctx.verbose);
    Ok(())
}

/// Human-readable rendering shared by the editing commands.
pub fn print_document(document: &WorkflowDocument, with_ids: bool) {
    let dim = Style::new().dim();

    let label = if document.trigger_label.is_empty() {
        dim.apply_to("(no label)".to_string()).to_string()
    } else {
        document.trigger_label.clone()
    };
    println!("{} {}", style("Trigger:").bold(), label);
    println!("{}", dim.apply_to("─".repeat(40)));

    if document.is_empty() {
        println!("{}", dim.apply_to("No actions configured"));
        return;
    }

    for (line, action) in document.preview_lines().iter().zip(&document.actions) {
        if with_ids {
            println!("  {}  {}", line, dim.apply_to(&action.instance_id));
        } else {
            println!("  {}", line);
        }
    }

    let duplicates = document.duplicate_ids();
    if !duplicates.is_empty() {
        let yellow = Style::new().yellow();
        println!();
        println!(
            "  {} duplicate instance ids: {}",
            yellow.apply_to("⚠"),
            duplicates.join(", ")
        );
    }
}
