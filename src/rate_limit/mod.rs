//! Fixed-window rate limiting for the phone reveal gate
//!
//! Counters live behind [`RateLimitStore`] so a single instance can keep them
//! in process memory while several instances share one Redis.

mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis::RedisStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;

/// Allowed requests per window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub max_requests: u64,
    pub window: Duration,
}

impl Quota {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl From<&RateLimitConfig> for Quota {
    fn from(cfg: &RateLimitConfig) -> Self {
        Self::new(cfg.max_requests, Duration::from_secs(cfg.window_seconds))
    }
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Admitted; `count` is the position within the current window
    Allowed { count: u64 },
    Limited,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rate limit store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key` at `now`
    ///
    /// A missing entry, or one whose window started more than `quota.window`
    /// before `now`, restarts at 1. A full window rejects without counting.
    async fn hit(&self, key: &str, quota: &Quota, now: Instant) -> Result<Decision, StoreError>;

    /// Drop entries whose window has ended, returning how many were removed
    async fn sweep(&self, quota: &Quota, now: Instant) -> usize;

    /// Number of tracked keys, when the store can tell cheaply
    fn len(&self) -> Option<usize>;
}

/// Rate limiter shared by every request handler
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    quota: Quota,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, quota: Quota) -> Self {
        Self { store, quota }
    }

    pub fn in_memory(quota: Quota) -> Self {
        Self::new(Arc::new(MemoryStore::new()), quota)
    }

    /// Build the limiter for the configured backend
    pub async fn from_config(cfg: &RateLimitConfig) -> anyhow::Result<Self> {
        let quota = Quota::from(cfg);
        match cfg.backend {
            crate::config::StoreBackend::Memory => Ok(Self::in_memory(quota)),
            #[cfg(feature = "redis")]
            crate::config::StoreBackend::Redis => {
                let url = cfg
                    .redis_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("rate_limit.redis_url is not set"))?;
                let store = RedisStore::connect(url).await?;
                Ok(Self::new(Arc::new(store), quota))
            }
            #[cfg(not(feature = "redis"))]
            crate::config::StoreBackend::Redis => {
                anyhow::bail!("Redis rate limit backend requires the `redis` feature")
            }
        }
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    /// Returns `true` if the request is allowed
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        match self.store.hit(key, &self.quota, now).await {
            Ok(Decision::Allowed { count }) => {
                debug!(count, limit = self.quota.max_requests, "Rate limit check passed");
                true
            }
            Ok(Decision::Limited) => false,
            Err(e) => {
                // Fail open: an unreachable store must not hide the phone number
                warn!(error = %e, "Rate limit store error, allowing request");
                true
            }
        }
    }

    pub async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    pub async fn sweep_at(&self, now: Instant) -> usize {
        self.store.sweep(&self.quota, now).await
    }

    pub fn tracked_keys(&self) -> Option<usize> {
        self.store.len()
    }

    /// Periodically purge expired windows
    pub async fn sweep_loop(self: Arc<Self>, every: Duration) {
        let mut interval = tokio::time::interval(every);

        loop {
            interval.tick().await;

            let removed = self.sweep().await;
            if let Some(remaining) = self.tracked_keys() {
                crate::metrics::record_tracked_keys(remaining);
                debug!(removed, remaining, "Rate limit sweep completed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    #[async_trait]
    impl RateLimitStore for FailingStore {
        async fn hit(&self, _key: &str, _quota: &Quota, _now: Instant) -> Result<Decision, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn sweep(&self, _quota: &Quota, _now: Instant) -> usize {
            0
        }

        fn len(&self) -> Option<usize> {
            None
        }
    }

    fn quota() -> Quota {
        Quota::new(20, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_twenty_allowed_then_limited() {
        let limiter = RateLimiter::in_memory(quota());
        let t0 = Instant::now();

        for i in 0..20 {
            assert!(
                limiter.check_at("1.2.3.4:curl", t0 + Duration::from_millis(i * 100)).await,
                "request {} should pass",
                i + 1
            );
        }
        assert!(!limiter.check_at("1.2.3.4:curl", t0 + Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::in_memory(quota());
        let t0 = Instant::now();

        for _ in 0..20 {
            assert!(limiter.check_at("k", t0).await);
        }
        assert!(!limiter.check_at("k", t0 + Duration::from_secs(60)).await);
        assert!(limiter.check_at("k", t0 + Duration::from_secs(61)).await);

        // New window started at t0+61s
        for _ in 0..19 {
            assert!(limiter.check_at("k", t0 + Duration::from_secs(62)).await);
        }
        assert!(!limiter.check_at("k", t0 + Duration::from_secs(63)).await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::in_memory(Quota::new(1, Duration::from_secs(60)));
        let now = Instant::now();

        assert!(limiter.check_at("a", now).await);
        assert!(!limiter.check_at("a", now).await);
        assert!(limiter.check_at("b", now).await);
    }

    #[tokio::test]
    async fn test_store_error_fails_open() {
        let limiter = RateLimiter::new(Arc::new(FailingStore), quota());
        assert!(limiter.check("k").await);
        assert_eq!(limiter.tracked_keys(), None);
    }

    #[tokio::test]
    async fn test_sweep_through_limiter() {
        let limiter = RateLimiter::in_memory(quota());
        let t0 = Instant::now();

        limiter.check_at("old", t0).await;
        limiter.check_at("new", t0 + Duration::from_secs(50)).await;

        assert_eq!(limiter.sweep_at(t0 + Duration::from_secs(70)).await, 1);
        assert_eq!(limiter.tracked_keys(), Some(1));
    }

    #[test]
    fn test_quota_from_config() {
        let cfg = RateLimitConfig::default();
        assert_eq!(Quota::from(&cfg), Quota::new(20, Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_from_config_memory() {
        let limiter = RateLimiter::from_config(&RateLimitConfig::default()).await.unwrap();
        assert_eq!(limiter.quota().max_requests, 20);
        assert_eq!(limiter.tracked_keys(), Some(0));
    }
}
