use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Instant;

use super::{Decision, Quota, RateLimitStore, StoreError};

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u64,
    window_start: Instant,
}

/// Process-local counters for single-instance deployments
///
/// Each key's read-modify-write happens under its shard lock, so concurrent
/// requests from one client cannot both take the last slot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, WindowEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn hit(&self, key: &str, quota: &Quota, now: Instant) -> Result<Decision, StoreError> {
        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        let expired = now.saturating_duration_since(entry.window_start) > quota.window;
        if entry.count == 0 || expired {
            entry.count = 1;
            entry.window_start = now;
            return Ok(Decision::Allowed { count: 1 });
        }

        if entry.count >= quota.max_requests {
            return Ok(Decision::Limited);
        }

        entry.count += 1;
        Ok(Decision::Allowed { count: entry.count })
    }

    async fn sweep(&self, quota: &Quota, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.window_start) <= quota.window);
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
