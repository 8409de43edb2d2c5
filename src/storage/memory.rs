//! In-process entry store
//!
//! Holds entries in a `BTreeMap` keyed by id, so pages come out in id order.
//! Uniqueness of `short_url` is checked under the write lock, which makes it
//! as authoritative as a unique index.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::{EntryStore, EntryUnitOfWork, ShortLinkEntry};
use crate::errors::{Result, ShortLinkError};

type Entries = Arc<RwLock<BTreeMap<i64, ShortLinkEntry>>>;

#[derive(Default, Clone)]
pub struct MemoryEntryStore {
    entries: Entries,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn short_url_taken(entries: &BTreeMap<i64, ShortLinkEntry>, short_url: &str, except: i64) -> bool {
    entries
        .values()
        .any(|e| e.id != except && e.short_url == short_url)
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn create(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        let mut entries = self.entries.write();

        if entries.contains_key(&entry.id) {
            return Err(ShortLinkError::store_failure(format!(
                "Entry id {} already exists",
                entry.id
            )));
        }
        if short_url_taken(&entries, &entry.short_url, entry.id) {
            return Err(ShortLinkError::duplicate_short_url(format!(
                "Short URL '{}' is already in use",
                entry.short_url
            )));
        }

        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<ShortLinkEntry>> {
        Ok(self.entries.read().get(&id).cloned())
    }

    async fn fetch_by_short_url(&self, short_url: &str) -> Result<Option<ShortLinkEntry>> {
        Ok(self
            .entries
            .read()
            .values()
            .find(|e| e.short_url == short_url)
            .cloned())
    }

    async fn find_by_short_url_and_flag(
        &self,
        short_url: &str,
        autogenerated: bool,
    ) -> Result<Option<ShortLinkEntry>> {
        Ok(self
            .entries
            .read()
            .values()
            .find(|e| e.short_url == short_url && e.autogenerated == autogenerated)
            .cloned())
    }

    async fn list_by_flag(
        &self,
        autogenerated: bool,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ShortLinkEntry>> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|e| e.autogenerated == autogenerated)
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        let mut entries = self.entries.write();

        if short_url_taken(&entries, &entry.short_url, entry.id) {
            return Err(ShortLinkError::duplicate_short_url(format!(
                "Short URL '{}' is already in use",
                entry.short_url
            )));
        }

        let stored = entries
            .get_mut(&entry.id)
            .ok_or_else(|| ShortLinkError::not_found(format!("Entry {} not found", entry.id)))?;
        stored.original_url = entry.original_url;
        stored.short_url = entry.short_url;
        stored.active = entry.active;
        stored.modified_date = entry.modified_date;

        Ok(stored.clone())
    }

    async fn begin_isolated(&self) -> Result<Box<dyn EntryUnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            entries: Arc::clone(&self.entries),
            staged: BTreeSet::new(),
        }))
    }
}

/// Deletes are staged by id and applied under a single write lock on
/// commit. The staged rows are exactly the ones removed, like rows locked by
/// a database DELETE.
struct MemoryUnitOfWork {
    entries: Entries,
    staged: BTreeSet<i64>,
}

#[async_trait]
impl EntryUnitOfWork for MemoryUnitOfWork {
    async fn delete_older_than(&mut self, cutoff: DateTime<Utc>) -> Result<u64> {
        let matching: Vec<i64> = self
            .entries
            .read()
            .values()
            .filter(|e| e.modified_date < cutoff && !self.staged.contains(&e.id))
            .map(|e| e.id)
            .collect();

        let count = matching.len() as u64;
        self.staged.extend(matching);
        Ok(count)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|id, _| !self.staged.contains(id));
        debug!("Memory store purged {} entries", before - entries.len());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(id: i64, short_url: &str, autogenerated: bool, modified: DateTime<Utc>) -> ShortLinkEntry {
        ShortLinkEntry {
            id,
            original_url: format!("https://example.com/{}", id),
            short_url: short_url.to_string(),
            autogenerated,
            active: true,
            create_date: modified,
            modified_date: modified,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_short_url() {
        let store = MemoryEntryStore::new();
        let now = Utc::now();
        store.create(entry(1, "abc", false, now)).await.unwrap();

        let err = store.create(entry(2, "abc", true, now)).await.unwrap_err();
        assert!(matches!(err, ShortLinkError::DuplicateShortUrl(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_immutable_fields() {
        let store = MemoryEntryStore::new();
        let now = Utc::now();
        store.create(entry(1, "abc", false, now)).await.unwrap();

        let mut changed = entry(1, "xyz", true, now + Duration::hours(1));
        changed.create_date = now + Duration::days(5);
        changed.active = false;
        let updated = store.update(changed).await.unwrap();

        assert_eq!(updated.short_url, "xyz");
        assert!(!updated.active);
        assert!(!updated.autogenerated);
        assert_eq!(updated.create_date, now);
        assert_eq!(updated.modified_date, now + Duration::hours(1));
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let store = MemoryEntryStore::new();
        let err = store.update(entry(9, "abc", false, Utc::now())).await.unwrap_err();
        assert!(matches!(err, ShortLinkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rolled_back_purge_keeps_entries() {
        let store = MemoryEntryStore::new();
        let now = Utc::now();
        store.create(entry(1, "old", false, now - Duration::days(10))).await.unwrap();

        let mut uow = store.begin_isolated().await.unwrap();
        assert_eq!(uow.delete_older_than(now).await.unwrap(), 1);
        uow.rollback().await.unwrap();
        assert_eq!(store.len(), 1);

        assert_eq!(store.delete_older_than(now).await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_commit_removes_exactly_the_staged_entries() {
        let store = MemoryEntryStore::new();
        let now = Utc::now();
        store.create(entry(1, "old", false, now - Duration::days(10))).await.unwrap();

        let mut uow = store.begin_isolated().await.unwrap();
        assert_eq!(uow.delete_older_than(now).await.unwrap(), 1);

        // Written after staging, so not part of this unit of work
        store.create(entry(2, "late", false, now - Duration::days(20))).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.fetch_by_id(2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_huge_page_bounds_do_not_overflow() {
        let store = MemoryEntryStore::new();
        store.create(entry(1, "a", true, Utc::now())).await.unwrap();

        assert_eq!(store.list_by_flag(true, 0, u64::MAX).await.unwrap().len(), 1);
        assert!(store.list_by_flag(true, u64::MAX, 10).await.unwrap().is_empty());
    }
}
