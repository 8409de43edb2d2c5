//! Entry storage
//!
//! [`EntryStore`] is the narrow persistence surface the lifecycle manager
//! and the retention sweeper depend on. Two implementations ship:
//! [`SeaOrmEntryStore`] (SQLite / MySQL / PostgreSQL) and
//! [`MemoryEntryStore`] (in-process, for tests and embedding).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::Result;

pub mod backend;
pub mod counter;
pub mod memory;
pub mod models;

pub use backend::SeaOrmEntryStore;
pub use counter::{ENTRY_COUNTER, IdAllocator, MemoryIdAllocator, SeaOrmIdAllocator};
pub use memory::MemoryEntryStore;
pub use models::ShortLinkEntry;

/// Persistent keyed store of short link entries
///
/// Fetches return `Ok(None)` when nothing matches; mapping that to a
/// not-found error is the caller's business. Write paths must reject a
/// `short_url` already held by another entry with
/// [`ShortLinkError::DuplicateShortUrl`](crate::errors::ShortLinkError),
/// even when a concurrent writer slipped past the caller's pre-check.
#[async_trait]
pub trait EntryStore: Send + Sync {
    fn backend_name(&self) -> &str;

    /// Persist a new entry whose id has already been allocated
    async fn create(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<ShortLinkEntry>>;

    /// Unique-index lookup, ignores the autogenerated flag
    async fn fetch_by_short_url(&self, short_url: &str) -> Result<Option<ShortLinkEntry>>;

    async fn find_by_short_url_and_flag(
        &self,
        short_url: &str,
        autogenerated: bool,
    ) -> Result<Option<ShortLinkEntry>>;

    /// One page of entries with the given flag, ordered by id ascending
    async fn list_by_flag(
        &self,
        autogenerated: bool,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ShortLinkEntry>>;

    /// Replace the mutable fields (original_url, short_url, active,
    /// modified_date) of an existing entry
    async fn update(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry>;

    /// Open a unit of work that is independent of any other transaction and
    /// runs at read-committed isolation (or stronger)
    async fn begin_isolated(&self) -> Result<Box<dyn EntryUnitOfWork>>;

    /// Remove every entry with `modified_date < cutoff` in one atomic step
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut uow = self.begin_isolated().await?;
        match uow.delete_older_than(cutoff).await {
            Ok(deleted) => {
                uow.commit().await?;
                Ok(deleted)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!("Rollback after failed delete also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// A transaction owned by one caller. Dropping it without `commit`
/// discards its changes.
#[async_trait]
pub trait EntryUnitOfWork: Send {
    async fn delete_older_than(&mut self, cutoff: DateTime<Utc>) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

pub struct StorageFactory;

impl StorageFactory {
    /// Open the configured database store
    pub async fn create() -> Result<Arc<SeaOrmEntryStore>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let store = SeaOrmEntryStore::new(database_url, &backend_type, &config.database).await?;
        Ok(Arc::new(store))
    }
}
