//! Monotonic id allocation
//!
//! Each named sequence hands out strictly increasing ids that are never
//! reused, even after the entries carrying them are deleted.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait,
};
use tracing::debug;

use super::backend::retry::{self, RetryConfig};
use crate::errors::{Result, ShortLinkError};
use migration::entities::counter;

/// Sequence used for short link entry ids
pub const ENTRY_COUNTER: &str = "short_link_entry";

#[async_trait]
pub trait IdAllocator: Send + Sync {
    /// Next id of the named sequence; the first call returns 1
    async fn next(&self, name: &str) -> Result<i64>;
}

/// Durable counters in the `counters` table
///
/// Every increment runs in its own transaction, so an id handed out is
/// consumed even if the caller's later write fails.
#[derive(Clone)]
pub struct SeaOrmIdAllocator {
    db: DatabaseConnection,
    retry_config: RetryConfig,
}

impl SeaOrmIdAllocator {
    pub fn new(db: DatabaseConnection, retry_config: RetryConfig) -> Self {
        Self { db, retry_config }
    }

    async fn increment(&self, name: &str) -> std::result::Result<i64, DbErr> {
        let txn = self.db.begin().await?;

        counter::Entity::insert(counter::ActiveModel {
            name: Set(name.to_string()),
            current_id: Set(0),
        })
        .on_conflict(
            OnConflict::column(counter::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        counter::Entity::update_many()
            .col_expr(
                counter::Column::CurrentId,
                Expr::col(counter::Column::CurrentId).add(1),
            )
            .filter(counter::Column::Name.eq(name))
            .exec(&txn)
            .await?;

        let current = counter::Entity::find_by_id(name.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("counter '{}'", name)))?;

        txn.commit().await?;
        Ok(current.current_id)
    }
}

#[async_trait]
impl IdAllocator for SeaOrmIdAllocator {
    async fn next(&self, name: &str) -> Result<i64> {
        let id = retry::with_retry(&format!("counter.next({})", name), self.retry_config, || {
            self.increment(name)
        })
        .await
        .map_err(|e| {
            ShortLinkError::store_failure(format!("Failed to allocate id from '{}': {}", name, e))
        })?;

        debug!("Allocated id {} from counter '{}'", id, name);
        Ok(id)
    }
}

/// Process-local counters
#[derive(Default)]
pub struct MemoryIdAllocator {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence so its next id is `current + 1`
    pub fn with_start(name: &str, current: i64) -> Self {
        let allocator = Self::default();
        allocator.counters.lock().insert(name.to_string(), current);
        allocator
    }
}

#[async_trait]
impl IdAllocator for MemoryIdAllocator {
    async fn next(&self, name: &str) -> Result<i64> {
        let mut counters = self.counters.lock();
        let current = counters.entry(name.to_string()).or_insert(0);
        *current += 1;
        Ok(*current)
    }
}
