//! Retention commands: one-off purge and the long-running sweeper

use colored::Colorize;

use crate::config::get_config;
use crate::config::validators::retention_age;
use crate::errors::{Result, ShortLinkError};
use crate::interfaces::cli::CliContext;
use crate::system::lifetime::listen_for_shutdown;

pub async fn purge(ctx: &CliContext, older_than_days: Option<u64>) -> Result<()> {
    let days = older_than_days.unwrap_or_else(|| get_config().retention.max_age_days);
    let cutoff = chrono::Utc::now()
        .checked_sub_signed(retention_age(days)?)
        .ok_or_else(|| ShortLinkError::config(format!("Age of {} days is out of range", days)))?;

    match ctx.sweeper.purge_older_than(cutoff).await {
        Some(deleted) => {
            println!(
                "{} Removed {} entries not modified in the last {} days",
                "✓".bold().green(),
                deleted.to_string().cyan(),
                days
            );
            Ok(())
        }
        // The sweeper already logged the cause
        None => Err(ShortLinkError::store_failure(
            "Retention sweep failed, see log for details",
        )),
    }
}

pub async fn sweep(ctx: &CliContext) -> Result<()> {
    let retention = get_config().retention.clone();
    if !retention.enabled {
        println!(
            "{} Retention is disabled (retention.enabled = false)",
            "ℹ".bold().blue()
        );
        return Ok(());
    }

    let handle = ctx
        .sweeper
        .clone()
        .spawn_background_task(retention.initial_delay(), retention.interval());

    listen_for_shutdown().await;
    handle.abort();
    Ok(())
}
