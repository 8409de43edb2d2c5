//! Entry commands: add, update, resolve, list

use colored::Colorize;

use crate::errors::{Result, ShortLinkError};
use crate::interfaces::cli::CliContext;
use crate::storage::ShortLinkEntry;

fn describe(entry: &ShortLinkEntry) -> String {
    let mut parts = vec![format!(
        "{} {} -> {}",
        format!("#{}", entry.id).dimmed(),
        entry.short_url.cyan(),
        entry.original_url.blue().underline()
    )];

    if !entry.active {
        parts.push("(inactive)".yellow().to_string());
    }

    parts.push(
        format!(
            "(modified: {})",
            entry.modified_date.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .dimmed()
        .to_string(),
    );

    parts.join(" ")
}

pub async fn add_entry(
    ctx: &CliContext,
    original_url: String,
    short_url: Option<String>,
) -> Result<()> {
    let autogenerated = short_url.is_none();
    let entry = ctx
        .entries
        .create_entry(&original_url, short_url.as_deref().unwrap_or(""), autogenerated)
        .await?;

    if autogenerated {
        println!(
            "{} Generated short URL: {}",
            "ℹ".bold().blue(),
            entry.short_url.magenta()
        );
    }
    println!("{} Added {}", "✓".bold().green(), describe(&entry));
    Ok(())
}

pub async fn update_entry(
    ctx: &CliContext,
    id: i64,
    original_url: String,
    short_url: Option<String>,
    active: bool,
) -> Result<()> {
    let short_url = match short_url {
        Some(s) => s,
        None => ctx.entries.get_entry(id).await?.short_url,
    };

    let entry = ctx
        .entries
        .update_entry(id, &original_url, &short_url, active)
        .await?;

    if entry.autogenerated && entry.short_url != short_url {
        println!(
            "{} Entry {} is autogenerated; its short URL stays {}",
            "ℹ".bold().blue(),
            id,
            entry.short_url.magenta()
        );
    }
    println!("{} Updated {}", "✓".bold().green(), describe(&entry));
    Ok(())
}

pub async fn resolve_entry(ctx: &CliContext, short_url: String, autogenerated: bool) -> Result<()> {
    let entry = ctx.entries.resolve(&short_url, autogenerated).await?;
    println!("{}", describe(&entry));
    Ok(())
}

pub async fn list_entries(
    ctx: &CliContext,
    autogenerated: bool,
    offset: u64,
    limit: u64,
    json: bool,
) -> Result<()> {
    let entries = ctx
        .entries
        .list_entries(autogenerated, offset, limit)
        .await?;

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| ShortLinkError::store_failure(format!("Failed to serialize entries: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    let kind = if autogenerated { "generated" } else { "custom" };
    if entries.is_empty() {
        println!("{} No {} entries found", "ℹ".bold().blue(), kind);
        return Ok(());
    }

    println!("{}", format!("{} entries:", kind).bold().green());
    println!();
    for entry in &entries {
        println!("  {}", describe(entry));
    }
    println!();
    println!(
        "{} Showing {} entries from offset {}",
        "ℹ".bold().blue(),
        entries.len().to_string().green(),
        offset
    );
    Ok(())
}
