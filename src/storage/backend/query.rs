//! Query operations for SeaOrmEntryStore
//!
//! Read-only database operations. All of them retry transient failures.

use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::converters::model_to_entry;
use super::{SeaOrmEntryStore, retry};
use crate::errors::{Result, ShortLinkError};
use crate::storage::ShortLinkEntry;

use migration::entities::short_link_entry;

impl SeaOrmEntryStore {
    pub(super) async fn load_by_id(&self, id: i64) -> Result<Option<ShortLinkEntry>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("fetch_by_id({})", id), self.retry_config, || async {
            short_link_entry::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| ShortLinkError::store_failure(format!("Failed to fetch entry {}: {}", id, e)))?;

        Ok(model.map(model_to_entry))
    }

    /// Lookup by short URL, optionally scoped to one autogenerated namespace
    pub(super) async fn load_by_short_url(
        &self,
        short_url: &str,
        autogenerated: Option<bool>,
    ) -> Result<Option<ShortLinkEntry>> {
        let db = &self.db;

        let mut condition = Condition::all().add(short_link_entry::Column::ShortUrl.eq(short_url));
        if let Some(flag) = autogenerated {
            condition = condition.add(short_link_entry::Column::Autogenerated.eq(flag));
        }

        let model = retry::with_retry(
            &format!("fetch_by_short_url({})", short_url),
            self.retry_config,
            || async {
                short_link_entry::Entity::find()
                    .filter(condition.clone())
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            ShortLinkError::store_failure(format!(
                "Failed to fetch entry by short URL '{}': {}",
                short_url, e
            ))
        })?;

        Ok(model.map(model_to_entry))
    }

    /// Offset/limit page ordered by primary key, stable absent writes
    ///
    /// Bounds are clamped to `i64::MAX`, the largest value the drivers bind.
    pub(super) async fn load_page_by_flag(
        &self,
        autogenerated: bool,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ShortLinkEntry>> {
        let db = &self.db;
        let offset = clamp_bound(offset);
        let limit = clamp_bound(limit);

        let models = retry::with_retry("list_by_flag", self.retry_config, || async {
            short_link_entry::Entity::find()
                .filter(short_link_entry::Column::Autogenerated.eq(autogenerated))
                .order_by_asc(short_link_entry::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| ShortLinkError::store_failure(format!("Failed to list entries: {}", e)))?;

        debug!(
            "Listed {} entries (autogenerated={}, offset={}, limit={})",
            models.len(),
            autogenerated,
            offset,
            limit
        );
        Ok(models.into_iter().map(model_to_entry).collect())
    }
}

fn clamp_bound(value: u64) -> u64 {
    value.min(i64::MAX as u64)
}
