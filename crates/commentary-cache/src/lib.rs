//! Two-tier read-through caching for comment storage.
//!
//! ## Architecture
//!
//! - **Local tier (moka)**: in-memory, bounded, TinyLFU eviction, short TTL,
//!   per process.
//! - **Remote tier (Redis)**: shared across processes, longer TTL.
//! - **Single-flight gate**: at most one backing-store fetch per cache key at
//!   a time; concurrent callers share the result.
//!
//! ## Cache Hierarchy
//!
//! ```text
//! list_by_video → local (moka) → remote (Redis) → backing store
//! ```
//!
//! ## Graceful Degradation
//!
//! If Redis is unavailable or disabled, the decorator automatically runs
//! with local-only caching; a failing cache tier degrades performance, never
//! correctness.
//!
//! ## Example
//!
//! ```ignore
//! use commentary_cache::{CacheConfig, CachedCommentStorage, RedisConfig, connect_remote_tier};
//! use commentary_db_postgres::{PostgresCommentStorage, PostgresConfig};
//! use std::sync::Arc;
//!
//! let backend = PostgresCommentStorage::new(PostgresConfig::default()).await?;
//! let remote = connect_remote_tier(&RedisConfig::default()).await;
//! let storage = CachedCommentStorage::new(Arc::new(backend), remote, CacheConfig::default());
//! let first_page = storage.list_by_video("v1", 10, 0).await?;
//! ```

mod cached;
mod config;
mod key;
mod payload;
mod remote;
mod singleflight;

pub use cached::CachedCommentStorage;
pub use config::{CacheConfig, RedisConfig, connect_remote_tier};
pub use key::list_comments_key;
pub use remote::RemoteTier;
pub use singleflight::{FlightAborted, FlightGroup};

// Re-export the trait so consumers of the decorator need only this crate
pub use commentary_storage::{Comment, CommentStorage, DynCommentStorage, NewComment, StorageError};
