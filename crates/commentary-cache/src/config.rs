//! Configuration for the caching decorator and its remote tier.

use serde::{Deserialize, Serialize};

use crate::remote::RemoteTier;

/// Redis configuration for the shared cache tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Enable Redis (gracefully degrades to local-only caching without it).
    /// Default: false (disabled for single-instance deployments).
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379").
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    16
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

/// Tuning knobs for the caching decorator.
///
/// The local tier is meant to absorb hot repeated reads within one process
/// and therefore expires sooner than the remote tier, which exists to
/// relieve the backing store across processes. Both TTLs are absolute from
/// write, not sliding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries in the local tier.
    #[serde(default = "default_local_capacity")]
    pub local_capacity: u64,

    /// Local tier TTL in seconds.
    #[serde(default = "default_local_ttl_secs")]
    pub local_ttl_secs: u64,

    /// Remote tier TTL in seconds.
    #[serde(default = "default_remote_ttl_secs")]
    pub remote_ttl_secs: u64,
}

fn default_local_capacity() -> u64 {
    1024
}

fn default_local_ttl_secs() -> u64 {
    60
}

fn default_remote_ttl_secs() -> u64 {
    180
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            local_capacity: default_local_capacity(),
            local_ttl_secs: default_local_ttl_secs(),
            remote_ttl_secs: default_remote_ttl_secs(),
        }
    }
}

/// Create a remote cache tier based on configuration.
///
/// ## Graceful Degradation
///
/// If Redis is disabled, or the pool cannot be created, or the initial
/// connection check fails, this returns `RemoteTier::Disabled` so the
/// decorator runs with local-only caching. A cache outage must never keep
/// the service from starting.
pub async fn connect_remote_tier(config: &RedisConfig) -> RemoteTier {
    use std::time::Duration;

    if !config.enabled {
        tracing::info!("Redis disabled, using local cache tier only");
        return RemoteTier::Disabled;
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    if let Some(ref mut pool_config) = redis_config.pool {
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));
    }

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache tier."
            );
            return RemoteTier::Disabled;
        }
    };

    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis successfully");
            RemoteTier::Redis(pool)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to Redis. Falling back to local cache tier."
            );
            RemoteTier::Disabled
        }
    }
}
