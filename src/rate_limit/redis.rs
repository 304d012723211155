use async_trait::async_trait;
use bb8_redis::{bb8::Pool, redis, RedisConnectionManager};
use std::time::Instant;

use super::{Decision, Quota, RateLimitStore, StoreError};

const KEY_PREFIX: &str = "stellarview:rate_limit:";

/// Returns the count before this hit and increments only while under the
/// limit. The first increment of a window sets its expiry.
const HIT_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
if current < tonumber(ARGV[1]) then
    if redis.call('INCR', KEYS[1]) == 1 then
        redis.call('PEXPIRE', KEYS[1], ARGV[2])
    end
end
return current
"#;

/// Counters shared across instances through Redis
///
/// The window is the key's TTL, started by the first counted hit. A key
/// expires once `window` has elapsed, so a hit landing exactly on the
/// boundary starts a new window here, while [`super::MemoryStore`] still
/// counts it against the old one. Expired windows disappear on their own
/// and `sweep` has nothing to do.
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    script: redis::Script,
}

impl RedisStore {
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self {
            pool,
            script: redis::Script::new(HIT_SCRIPT),
        }
    }

    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let manager = RedisConnectionManager::new(url)?;
        let pool = Pool::builder().build(manager).await?;
        tracing::info!("Connected rate limit store to Redis");
        Ok(Self::new(pool))
    }
}

/// Decision for a hit that found `current` requests already counted
fn decide(current: u64, quota: &Quota) -> Decision {
    if current >= quota.max_requests {
        Decision::Limited
    } else {
        Decision::Allowed { count: current + 1 }
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn hit(&self, key: &str, quota: &Quota, _now: Instant) -> Result<Decision, StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let window_ms = u64::try_from(quota.window.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        let current: u64 = self
            .script
            .key(format!("{}{}", KEY_PREFIX, key))
            .arg(quota.max_requests)
            .arg(window_ms)
            .invoke_async(&mut *conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(decide(current, quota))
    }

    async fn sweep(&self, _quota: &Quota, _now: Instant) -> usize {
        0
    }

    fn len(&self) -> Option<usize> {
        None
    }
}
