//! 过期条目清理任务
//!
//! Removes entries whose `modified_date` is older than a cutoff. Each sweep
//! runs in a unit of work of its own and is best effort: a failed sweep is
//! logged and the next one tries again.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::storage::EntryStore;
use crate::utils::Clock;

pub struct RetentionSweeper {
    store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn EntryStore>, clock: Arc<dyn Clock>, max_age: Duration) -> Self {
        Self {
            store,
            clock,
            max_age,
        }
    }

    /// Delete every entry with `modified_date < cutoff`
    ///
    /// Runs the store's bulk delete, which opens a unit of work of its own.
    /// Never fails: returns the number of deleted entries, or `None` after
    /// logging the failure.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Option<u64> {
        match self.store.delete_older_than(cutoff).await {
            Ok(deleted) => {
                info!(
                    "Retention sweep removed {} entries not modified since {}",
                    deleted, cutoff
                );
                Some(deleted)
            }
            Err(e) => {
                error!("Unable to remove old short link entries: {}", e);
                None
            }
        }
    }

    /// Sweep with the cutoff `now - max_age`
    ///
    /// A negative or unrepresentable age would put the cutoff at or past
    /// now; such a sweep is refused.
    pub async fn purge_expired(&self) -> Option<u64> {
        let cutoff = if self.max_age > Duration::zero() {
            self.clock.now().checked_sub_signed(self.max_age)
        } else {
            None
        };

        match cutoff {
            Some(cutoff) => self.purge_older_than(cutoff).await,
            None => {
                error!(
                    "Unable to remove old short link entries: max age of {}s is out of range",
                    self.max_age.num_seconds()
                );
                None
            }
        }
    }

    /// 启动后台清理任务
    ///
    /// Sweeps after `initial_delay`, then every `interval`.
    pub fn spawn_background_task(
        self: Arc<Self>,
        initial_delay: StdDuration,
        interval: StdDuration,
    ) -> tokio::task::JoinHandle<()> {
        info!(
            "Retention sweeper started (interval: {}s, max age: {} days)",
            interval.as_secs(),
            self.max_age.num_days()
        );

        tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;

            loop {
                self.purge_expired().await;
                tokio::time::sleep(interval).await;
            }
        })
    }
}
