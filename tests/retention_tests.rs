//! RetentionSweeper tests
//!
//! Failure handling is checked with a store whose transactions fail on
//! demand and a tracing layer that counts error events.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shortlink_registry::errors::{Result, ShortLinkError};
use shortlink_registry::services::RetentionSweeper;
use shortlink_registry::storage::{
    EntryStore, EntryUnitOfWork, MemoryEntryStore, ShortLinkEntry,
};
use shortlink_registry::utils::FixedClock;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

// =============================================================================
// Test Setup
// =============================================================================

/// Counts ERROR events seen by the subscriber
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum FailAt {
    Begin,
    Delete,
    Commit,
}

/// Store whose unit of work fails at a chosen step
struct FailingStore {
    fail_at: FailAt,
    rollbacks: Arc<AtomicUsize>,
}

impl FailingStore {
    fn new(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            rollbacks: Arc::new(AtomicUsize::new(0)),
        }
    }
}

fn unsupported<T>() -> Result<T> {
    Err(ShortLinkError::store_failure("not supported by this store"))
}

#[async_trait]
impl EntryStore for FailingStore {
    fn backend_name(&self) -> &str {
        "failing"
    }

    async fn create(&self, _entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        unsupported()
    }

    async fn fetch_by_id(&self, _id: i64) -> Result<Option<ShortLinkEntry>> {
        unsupported()
    }

    async fn fetch_by_short_url(&self, _short_url: &str) -> Result<Option<ShortLinkEntry>> {
        unsupported()
    }

    async fn find_by_short_url_and_flag(
        &self,
        _short_url: &str,
        _autogenerated: bool,
    ) -> Result<Option<ShortLinkEntry>> {
        unsupported()
    }

    async fn list_by_flag(
        &self,
        _autogenerated: bool,
        _offset: u64,
        _limit: u64,
    ) -> Result<Vec<ShortLinkEntry>> {
        unsupported()
    }

    async fn update(&self, _entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        unsupported()
    }

    async fn begin_isolated(&self) -> Result<Box<dyn EntryUnitOfWork>> {
        if self.fail_at == FailAt::Begin {
            return Err(ShortLinkError::store_failure("connection refused"));
        }
        Ok(Box::new(FailingUnitOfWork {
            fail_at: self.fail_at,
            rollbacks: self.rollbacks.clone(),
        }))
    }
}

struct FailingUnitOfWork {
    fail_at: FailAt,
    rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl EntryUnitOfWork for FailingUnitOfWork {
    async fn delete_older_than(&mut self, _cutoff: DateTime<Utc>) -> Result<u64> {
        if self.fail_at == FailAt::Delete {
            return Err(ShortLinkError::store_failure("disk I/O error"));
        }
        Ok(3)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if self.fail_at == FailAt::Commit {
            return Err(ShortLinkError::store_failure("commit failed"));
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
}

fn sweeper_over(store: Arc<dyn EntryStore>) -> RetentionSweeper {
    RetentionSweeper::new(store, Arc::new(FixedClock::new(now())), Duration::days(30))
}

// =============================================================================
// Failure isolation
// =============================================================================

#[cfg(test)]
mod failure_tests {
    use super::*;

    async fn run_failing(fail_at: FailAt) -> (Option<u64>, usize, usize) {
        let counter = ErrorCounter::default();
        let _guard = tracing_subscriber::registry()
            .with(counter.clone())
            .set_default();

        let store = Arc::new(FailingStore::new(fail_at));
        let rollbacks = store.rollbacks.clone();
        let result = sweeper_over(store).purge_older_than(now()).await;

        (result, counter.count(), rollbacks.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_delete_failure_is_logged_once_and_swallowed() {
        let (result, errors, rollbacks) = run_failing(FailAt::Delete).await;
        assert_eq!(result, None);
        assert_eq!(errors, 1);
        assert_eq!(rollbacks, 1);
    }

    #[tokio::test]
    async fn test_begin_failure_is_logged_once_and_swallowed() {
        let (result, errors, rollbacks) = run_failing(FailAt::Begin).await;
        assert_eq!(result, None);
        assert_eq!(errors, 1);
        assert_eq!(rollbacks, 0);
    }

    #[tokio::test]
    async fn test_commit_failure_is_logged_once_and_swallowed() {
        let (result, errors, _) = run_failing(FailAt::Commit).await;
        assert_eq!(result, None);
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_success_logs_no_errors() {
        let counter = ErrorCounter::default();
        let _guard = tracing_subscriber::registry()
            .with(counter.clone())
            .set_default();

        let sweeper = sweeper_over(Arc::new(MemoryEntryStore::new()));
        assert_eq!(sweeper.purge_older_than(now()).await, Some(0));
        assert_eq!(counter.count(), 0);
    }
}

// =============================================================================
// Background task
// =============================================================================

#[cfg(test)]
mod background_tests {
    use super::*;

    fn entry(id: i64, modified: DateTime<Utc>) -> ShortLinkEntry {
        ShortLinkEntry {
            id,
            original_url: "https://example.com".to_string(),
            short_url: format!("bg{}", id),
            autogenerated: false,
            active: true,
            create_date: modified,
            modified_date: modified,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_task_sweeps_on_schedule() {
        let store = Arc::new(MemoryEntryStore::new());
        store.create(entry(1, now() - Duration::days(60))).await.unwrap();

        let clock = Arc::new(FixedClock::new(now()));
        let sweeper = Arc::new(RetentionSweeper::new(
            store.clone(),
            clock.clone(),
            Duration::days(30),
        ));
        let handle = sweeper.spawn_background_task(
            StdDuration::from_secs(10),
            StdDuration::from_secs(3600),
        );

        tokio::time::sleep(StdDuration::from_secs(5)).await;
        assert_eq!(store.len(), 1);

        tokio::time::sleep(StdDuration::from_secs(10)).await;
        assert_eq!(store.len(), 0);

        // An entry that ages past the threshold goes on the next tick
        store.create(entry(2, now())).await.unwrap();
        clock.advance(Duration::days(31));
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        assert_eq!(store.len(), 0);

        handle.abort();
    }
}
