//! CLI interface module

pub mod commands;

use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::services::{EntryService, RetentionSweeper};
use crate::storage::StorageFactory;
use crate::utils::SystemClock;

/// Services wired to the configured database
pub struct CliContext {
    pub entries: EntryService,
    pub sweeper: Arc<RetentionSweeper>,
}

impl CliContext {
    pub async fn open() -> anyhow::Result<Self> {
        let config = get_config();
        let store = StorageFactory::create()
            .await
            .context("Failed to create storage backend")?;
        let ids = Arc::new(store.id_allocator());
        let clock = Arc::new(SystemClock);

        let entries = EntryService::new(
            store.clone(),
            ids,
            clock.clone(),
            config.shortlink.autogenerated_prefix.clone(),
        );
        let sweeper = Arc::new(RetentionSweeper::new(
            store,
            clock,
            config.retention.max_age()?,
        ));

        Ok(Self { entries, sweeper })
    }
}

/// Run one command
///
/// Domain failures come back as [`ShortLinkError`](crate::errors::ShortLinkError)
/// inside the `anyhow::Error`, so callers can downcast them for display.
pub async fn run_cli(command: Commands) -> anyhow::Result<()> {
    // Commands that never touch the database
    if let Commands::Config { action } = command {
        return match action {
            ConfigCommands::Generate { output_path, force } => {
                Ok(commands::generate_config(output_path, force)?)
            }
        };
    }

    let ctx = CliContext::open().await?;

    let result = match command {
        Commands::Add {
            original_url,
            short_url,
        } => commands::add_entry(&ctx, original_url, short_url).await,
        Commands::Update {
            id,
            original_url,
            short_url,
            inactive,
        } => commands::update_entry(&ctx, id, original_url, short_url, !inactive).await,
        Commands::Resolve { short_url, custom } => {
            commands::resolve_entry(&ctx, short_url, !custom).await
        }
        Commands::List {
            custom,
            offset,
            limit,
            json,
        } => commands::list_entries(&ctx, !custom, offset, limit, json).await,
        Commands::Purge { older_than_days } => commands::purge(&ctx, older_than_days).await,
        Commands::Sweep => commands::sweep(&ctx).await,
        Commands::Config { .. } => Ok(()),
    };
    Ok(result?)
}
