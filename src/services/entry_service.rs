//! Short link entry lifecycle
//!
//! Validation, id allocation, short code generation and persistence for
//! entry creation and update, plus the read paths callers resolve and list
//! entries through.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{Result, ShortLinkError};
use crate::storage::{ENTRY_COUNTER, EntryStore, IdAllocator, ShortLinkEntry};
use crate::utils::{Clock, generated_short_url, is_blank};

/// Service for short link entry operations
///
/// The uniqueness lookup performed here only produces a friendly error.
/// The store's unique index decides races between concurrent writers.
pub struct EntryService {
    store: Arc<dyn EntryStore>,
    ids: Arc<dyn IdAllocator>,
    clock: Arc<dyn Clock>,
    autogenerated_prefix: String,
}

impl EntryService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        ids: Arc<dyn IdAllocator>,
        clock: Arc<dyn Clock>,
        autogenerated_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            ids,
            clock,
            autogenerated_prefix: autogenerated_prefix.into(),
        }
    }

    pub fn autogenerated_prefix(&self) -> &str {
        &self.autogenerated_prefix
    }

    /// Create an entry
    ///
    /// For `autogenerated` entries any supplied `short_url` is replaced by
    /// the prefix followed by the encoded id.
    pub async fn create_entry(
        &self,
        original_url: &str,
        short_url: &str,
        autogenerated: bool,
    ) -> Result<ShortLinkEntry> {
        self.validate(None, original_url, short_url, autogenerated)
            .await?;

        let id = self.ids.next(ENTRY_COUNTER).await?;
        let now = self.clock.now();

        let short_url = if autogenerated {
            let id = u64::try_from(id).map_err(|_| {
                ShortLinkError::store_failure(format!("Allocator returned negative id {}", id))
            })?;
            generated_short_url(&self.autogenerated_prefix, id)
        } else {
            short_url.to_string()
        };

        let entry = ShortLinkEntry {
            id,
            original_url: original_url.to_string(),
            short_url,
            autogenerated,
            active: true,
            create_date: now,
            modified_date: now,
        };

        let entry = self.store.create(entry).await?;

        info!(
            "EntryService: created entry {} '{}' -> '{}' (autogenerated={})",
            entry.id, entry.short_url, entry.original_url, entry.autogenerated
        );
        Ok(entry)
    }

    /// Update an entry's original URL, active flag and, for custom entries,
    /// its short URL
    pub async fn update_entry(
        &self,
        id: i64,
        original_url: &str,
        short_url: &str,
        active: bool,
    ) -> Result<ShortLinkEntry> {
        let mut entry = self.get_entry(id).await?;

        self.validate(Some(id), original_url, short_url, entry.autogenerated)
            .await?;

        entry.modified_date = self.clock.now();
        entry.original_url = original_url.to_string();
        if !entry.autogenerated {
            entry.short_url = short_url.to_string();
        } else if !short_url.is_empty() && short_url != entry.short_url {
            debug!(
                "Ignoring short URL change for autogenerated entry {} ('{}' stays)",
                id, entry.short_url
            );
        }
        entry.active = active;

        let entry = self.store.update(entry).await?;

        info!(
            "EntryService: updated entry {} '{}' -> '{}' (active={})",
            entry.id, entry.short_url, entry.original_url, entry.active
        );
        Ok(entry)
    }

    pub async fn get_entry(&self, id: i64) -> Result<ShortLinkEntry> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| ShortLinkError::not_found(format!("Entry {} not found", id)))
    }

    /// Look up an entry by short URL within the generated or custom namespace
    pub async fn resolve(&self, short_url: &str, autogenerated: bool) -> Result<ShortLinkEntry> {
        self.store
            .find_by_short_url_and_flag(short_url, autogenerated)
            .await?
            .ok_or_else(|| {
                ShortLinkError::not_found(format!(
                    "No {} entry with short URL '{}'",
                    if autogenerated { "autogenerated" } else { "custom" },
                    short_url
                ))
            })
    }

    pub async fn list_entries(
        &self,
        autogenerated: bool,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ShortLinkEntry>> {
        self.store.list_by_flag(autogenerated, offset, limit).await
    }

    /// Shared create/update validation
    ///
    /// `entry_id` is `None` on create, so any existing holder of `short_url`
    /// is a conflict; on update the entry itself is not.
    async fn validate(
        &self,
        entry_id: Option<i64>,
        original_url: &str,
        short_url: &str,
        autogenerated: bool,
    ) -> Result<()> {
        if is_blank(original_url) {
            return Err(ShortLinkError::original_url_required(
                "Original URL must not be empty",
            ));
        }

        if !autogenerated {
            if is_blank(short_url) {
                return Err(ShortLinkError::short_url_required(
                    "A custom short URL is required when the entry is not autogenerated",
                ));
            }
            if short_url.starts_with(&self.autogenerated_prefix) {
                return Err(ShortLinkError::reserved_short_url(format!(
                    "Short URL '{}' uses the reserved prefix '{}'",
                    short_url, self.autogenerated_prefix
                )));
            }
        }

        if short_url.is_empty() {
            return Ok(());
        }

        if let Some(existing) = self.store.fetch_by_short_url(short_url).await?
            && Some(existing.id) != entry_id
        {
            return Err(ShortLinkError::duplicate_short_url(format!(
                "Short URL '{}' is already used by entry {}",
                short_url, existing.id
            )));
        }

        Ok(())
    }
}
