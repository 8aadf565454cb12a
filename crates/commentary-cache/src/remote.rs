//! Remote (shared) cache tier backed by Redis.
//!
//! Every failure in this module is absorbed: a Redis outage must degrade
//! read performance, never correctness. Lookups that fail are reported as
//! misses and writes that fail are dropped, both at `warn` level.

use std::time::Duration;

use deadpool_redis::Pool;
use redis::AsyncCommands;

/// Remote cache tier shared across processes.
///
/// ## Modes
///
/// - **Disabled**: every lookup is a miss, every write a no-op. Used when
///   Redis is not configured or unreachable at startup.
/// - **Redis**: pooled connections to a shared Redis instance.
#[derive(Clone)]
pub enum RemoteTier {
    /// No shared tier; the decorator caches locally only.
    Disabled,

    /// Shared tier backed by a Redis pool.
    Redis(Pool),
}

impl RemoteTier {
    /// Get a value from the remote tier.
    ///
    /// Returns `None` on a miss and on any Redis failure (logged).
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let pool = match self {
            RemoteTier::Disabled => return None,
            RemoteTier::Redis(pool) => pool,
        };

        match pool.get().await {
            Ok(mut conn) => match conn.get::<_, Option<Vec<u8>>>(key).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Redis GET error, treating as miss");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to get Redis connection, treating as miss");
                None
            }
        }
    }

    /// Store a value in the remote tier with the given TTL.
    ///
    /// Failures are logged and dropped.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let pool = match self {
            RemoteTier::Disabled => return,
            RemoteTier::Redis(pool) => pool,
        };

        let ttl_secs = ttl_seconds(ttl);
        match pool.get().await {
            Ok(mut conn) => {
                if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
                    tracing::warn!(key = %key, error = %e, "Redis SET error, entry not cached remotely");
                } else {
                    tracing::debug!(key = %key, ttl_secs, "cache set (remote)");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to get Redis connection, entry not cached remotely");
            }
        }
    }

    /// Check if the remote tier is reachable (for health checks).
    pub async fn is_available(&self) -> bool {
        match self {
            RemoteTier::Disabled => false,
            RemoteTier::Redis(pool) => pool.get().await.is_ok(),
        }
    }
}

/// SETEX rejects a TTL of 0, so sub-second durations round up to 1s.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_never_truncates_to_zero() {
        assert_eq!(ttl_seconds(Duration::from_millis(250)), 1);
        assert_eq!(ttl_seconds(Duration::ZERO), 1);
        assert_eq!(ttl_seconds(Duration::from_secs(180)), 180);
    }
}
