//! Editing commands - label, add, remove, move and clear.
//!
//! Each command loads the saved document, applies one builder operation and
//! saves the result. A rejected operation leaves the saved file untouched.

use anyhow::{Result, bail};
use clap::Args;
use clickflow_workflow::{WorkflowBuilder, WorkflowDocument, catalog};
use console::Style;

use super::Context;
use super::show::print_document;

/// Arguments for the label command.
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// New trigger label (may be empty)
    pub text: String,
}

/// Arguments for the add command.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Action id or alias (see `clickflow actions`)
    pub kind: String,

    /// Parameter for actions that take one
    #[arg(default_value = "")]
    pub param: String,
}

/// Arguments for the remove command.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// 1-based position of the action
    pub index: usize,
}

/// Arguments for the move command.
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// 1-based position of the action to move
    pub from: usize,

    /// 1-based position it should end up at
    pub to: usize,
}

/// Arguments for the clear command.
#[derive(Args, Debug)]
pub struct ClearArgs {}

/// Run the label command.
pub async fn label(args: LabelArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_or_default()?;
    let next = WorkflowBuilder::default().set_label(&document, args.text);
    commit(ctx, &next, "Label updated")
}

/// Run the add command.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_or_default()?;
    let next = WorkflowBuilder::default().append(&document, &args.kind, args.param.as_str())?;

    if let Some(def) = catalog::lookup(&args.kind)
        && !def.has_param()
        && !args.param.is_empty()
    {
        let dim = Style::new().dim();
        eprintln!(
            "{}",
            dim.apply_to(format!("{} takes no parameter; ignoring it", def.label))
        );
    }

    let added = next
        .actions
        .last()
        .map(|a| a.display_label.clone())
        .unwrap_or_default();
    commit(
        ctx,
        &next,
        &format!("Added {} at position {}", added, next.len()),
    )
}

/// Run the remove command.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_or_default()?;
    let index = to_index(args.index, &document)?;
    let next = WorkflowBuilder::default().remove_at(&document, index)?;
    let removed = &document.actions[index].display_label;
    commit(
        ctx,
        &next,
        &format!("Removed {} from position {}", removed, args.index),
    )
}

/// Run the move command.
pub async fn move_action(args: MoveArgs, ctx: &Context) -> Result<()> {
    let document = ctx.load_or_default()?;
    let from = to_index(args.from, &document)?;
    let to = to_index(args.to, &document)?;
    let next = WorkflowBuilder::default().move_to(&document, from, to)?;
    commit(
        ctx,
        &next,
        &format!("Moved position {} to {}", args.from, args.to),
    )
}

/// Run the clear command.
pub async fn clear(_args: ClearArgs, ctx: &Context) -> Result<()> {
    commit(ctx, &WorkflowDocument::new(), "Workflow cleared")
}

/// Convert a 1-based position to an index into `document`.
fn to_index(position: usize, document: &WorkflowDocument) -> Result<usize> {
    if position == 0 || position > document.len() {
        bail!(
            "Position {} out of range: workflow has {} action(s)",
            position,
            document.len()
        );
    }
    Ok(position - 1)
}

fn commit(ctx: &Context, document: &WorkflowDocument, message: &str) -> Result<()> {
    ctx.save_document(document)?;
    tracing::debug!("Saved workflow to {}", ctx.workflow_path().display());

    if ctx.json_output {
        println!("{}", document.to_json()?);
    } else {
        let green = Style::new().green();
        println!("{} {}", green.apply_to("✓"), message);
        println!();
        print_document(document, ctx.verbose);
    }
    Ok(())
}
