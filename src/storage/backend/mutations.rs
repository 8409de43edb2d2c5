//! Mutation operations for SeaOrmEntryStore
//!
//! Writes go through the `short_url` unique index; a violation surfaces as
//! `DuplicateShortUrl` via `From<DbErr>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IsolationLevel, QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use super::converters::{entry_to_active_model, model_to_entry};
use super::{SeaOrmEntryStore, retry};
use crate::errors::{Result, ShortLinkError};
use crate::storage::{EntryUnitOfWork, ShortLinkEntry};

use migration::entities::short_link_entry;

impl SeaOrmEntryStore {
    /// Insert once; a retry after an ambiguous failure could report our own
    /// row as a duplicate
    pub(super) async fn insert_entry(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        let model = entry_to_active_model(&entry, true)
            .insert(&self.db)
            .await
            .map_err(ShortLinkError::from)?;

        debug!("Entry {} inserted with short URL '{}'", model.id, model.short_url);
        Ok(model_to_entry(model))
    }

    pub(super) async fn save_entry(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        let db = &self.db;
        let id = entry.id;

        let result = retry::with_retry(&format!("update({})", id), self.retry_config, || async {
            entry_to_active_model(&entry, false).update(db).await
        })
        .await;

        match result {
            Ok(model) => Ok(model_to_entry(model)),
            Err(DbErr::RecordNotUpdated) => {
                Err(ShortLinkError::not_found(format!("Entry {} not found", id)))
            }
            Err(e) => Err(ShortLinkError::from(e)),
        }
    }
}

/// A transaction of its own, opened on the pool rather than joined to any
/// caller's transaction
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmUnitOfWork {
    pub async fn begin(db: &DatabaseConnection, backend_name: &str) -> Result<Self> {
        // SQLite has no per-transaction isolation levels; its transactions
        // are already serializable.
        let isolation = if backend_name == "sqlite" {
            None
        } else {
            Some(IsolationLevel::ReadCommitted)
        };

        let txn = db
            .begin_with_config(isolation, None)
            .await
            .map_err(|e| ShortLinkError::store_failure(format!("Failed to begin transaction: {}", e)))?;

        Ok(Self { txn })
    }
}

#[async_trait]
impl EntryUnitOfWork for SeaOrmUnitOfWork {
    async fn delete_older_than(&mut self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = short_link_entry::Entity::delete_many()
            .filter(short_link_entry::Column::ModifiedDate.lt(cutoff))
            .exec(&self.txn)
            .await
            .map_err(|e| {
                ShortLinkError::store_failure(format!("Failed to delete entries older than {}: {}", cutoff, e))
            })?;

        info!(
            "Deleted {} entries not modified since {}",
            result.rows_affected, cutoff
        );
        Ok(result.rows_affected)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.txn
            .commit()
            .await
            .map_err(|e| ShortLinkError::store_failure(format!("Failed to commit transaction: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.txn
            .rollback()
            .await
            .map_err(|e| ShortLinkError::store_failure(format!("Failed to roll back transaction: {}", e)))
    }
}
