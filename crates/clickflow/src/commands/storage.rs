//! Storage command - inspects the key-value store.

use anyhow::Result;
use clap::Args;
use clickflow_workflow::KeyValueStore;
use console::{Style, style};

use super::Context;

/// Arguments for the storage command.
#[derive(Args, Debug)]
pub struct StorageArgs {
    /// Show only this key
    pub key: Option<String>,
}

/// Run the storage command.
pub async fn run(args: StorageArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_storage()?;
    let dim = Style::new().dim();

    if let Some(key) = args.key {
        let value = store.get(&key)?;
        if ctx.json_output {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            match value {
                Some(value) => println!("{}", value),
                None => println!("{}", dim.apply_to("Not found")),
            }
        }
        return Ok(());
    }

    let entries = store.entries();
    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", style("Storage").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    if entries.is_empty() {
        println!("{}", dim.apply_to("No entries"));
    } else {
        for (key, value) in &entries {
            println!("  {} = {}", key, value);
        }
    }
    if ctx.verbose {
        println!();
        println!("{}", dim.apply_to(store.path().display().to_string()));
    }
    Ok(())
}
