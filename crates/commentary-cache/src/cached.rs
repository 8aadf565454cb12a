//! Read-through caching decorator for comment storage.
//!
//! Wraps any `CommentStorage` and exposes the identical capability set.
//! Only `list_by_video` is cached; every write operation is forwarded
//! verbatim with no cache interaction. Writes therefore do not invalidate
//! cached lists: readers may observe pre-write data until the tier TTLs
//! lapse. This is a deliberate bounded-staleness trade-off, not an
//! oversight.
//!
//! ## Read path
//!
//! ```text
//! list_by_video → local tier (moka) → remote tier (Redis) → backing store
//! ```
//!
//! The remote lookup and the backing-store fetch run behind a per-key
//! single-flight gate: on a cold cache, N concurrent callers for the same
//! `(video_id, limit, offset)` produce exactly one backing-store query and
//! share its result, success or failure. Nothing is written to either tier
//! on failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use uuid::Uuid;

use commentary_storage::{Comment, CommentStorage, DynCommentStorage, NewComment, StorageError};

use crate::config::CacheConfig;
use crate::key::list_comments_key;
use crate::payload::{decode_comments, encode_comments};
use crate::remote::RemoteTier;
use crate::singleflight::FlightGroup;

type CachedList = Arc<Vec<Comment>>;

/// Caching decorator around a comment storage backend.
///
/// Cheap to share: hold it in an `Arc` and clone across tasks.
pub struct CachedCommentStorage {
    inner: DynCommentStorage,
    /// Local tier: bounded, TinyLFU-evicted, short TTL, per process.
    local: Cache<String, CachedList>,
    /// Remote tier: shared across processes, longer TTL.
    remote: RemoteTier,
    remote_ttl: Duration,
    flights: FlightGroup<Result<CachedList, StorageError>>,
}

impl CachedCommentStorage {
    /// Creates a new caching decorator around `inner`.
    ///
    /// The remote tier handle must be constructed by the caller (see
    /// [`crate::config::connect_remote_tier`]); the decorator does not own
    /// its lifecycle.
    #[must_use]
    pub fn new(inner: DynCommentStorage, remote: RemoteTier, config: CacheConfig) -> Self {
        if config.local_ttl_secs > config.remote_ttl_secs {
            tracing::warn!(
                local_ttl_secs = config.local_ttl_secs,
                remote_ttl_secs = config.remote_ttl_secs,
                "local tier TTL exceeds remote tier TTL; local entries will outlive the shared copy"
            );
        }

        let local = Cache::builder()
            .max_capacity(config.local_capacity)
            .time_to_live(Duration::from_secs(config.local_ttl_secs))
            .build();

        Self {
            inner,
            local,
            remote,
            remote_ttl: Duration::from_secs(config.remote_ttl_secs),
            flights: FlightGroup::new(),
        }
    }

    /// Number of entries currently in the local tier.
    ///
    /// Pending internal maintenance may make this an estimate.
    pub fn local_entry_count(&self) -> u64 {
        self.local.entry_count()
    }
}

/// The single-flight fill: remote tier lookup, then backing store fetch.
///
/// Runs as a detached task so that a caller abandoning its request does not
/// cancel a fetch other waiters depend on; hence the owned arguments.
async fn fill(
    inner: DynCommentStorage,
    local: Cache<String, CachedList>,
    remote: RemoteTier,
    remote_ttl: Duration,
    key: String,
    video_id: String,
    limit: i64,
    offset: i64,
) -> Result<CachedList, StorageError> {
    if let Some(bytes) = remote.get(&key).await {
        match decode_comments(&bytes) {
            Ok(comments) => {
                tracing::debug!(key = %key, "cache hit (remote)");
                let comments = Arc::new(comments);
                local.insert(key, Arc::clone(&comments)).await;
                return Ok(comments);
            }
            Err(e) => {
                // Treated as a miss; the next successful fill overwrites it.
                tracing::warn!(key = %key, error = %e, "Corrupt cached payload, treating as miss");
            }
        }
    }

    tracing::debug!(key = %key, "cache miss, fetching from backing store");
    let comments = match inner.list_by_video(&video_id, limit, offset).await {
        Ok(comments) => comments,
        Err(e) => {
            // No negative caching: neither tier is written on failure.
            tracing::debug!(key = %key, category = %e.category(), "backing store fetch failed");
            return Err(e);
        }
    };

    match encode_comments(&comments) {
        Ok(bytes) => remote.set(&key, bytes, remote_ttl).await,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to serialize comment list for cache");
        }
    }

    let comments = Arc::new(comments);
    local.insert(key, Arc::clone(&comments)).await;
    Ok(comments)
}

#[async_trait]
impl CommentStorage for CachedCommentStorage {
    async fn list_by_video(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StorageError> {
        let key = list_comments_key(video_id, limit, offset);

        if let Some(cached) = self.local.get(&key).await {
            tracing::debug!(key = %key, "cache hit (local)");
            return Ok(cached.as_ref().clone());
        }

        let fill = fill(
            Arc::clone(&self.inner),
            self.local.clone(),
            self.remote.clone(),
            self.remote_ttl,
            key.clone(),
            video_id.to_string(),
            limit,
            offset,
        );

        let result = self
            .flights
            .run(&key, fill)
            .await
            .map_err(|e| StorageError::internal(e.to_string()))?;

        result.map(|comments| comments.as_ref().clone())
    }

    async fn create(&self, comment: &NewComment) -> Result<Uuid, StorageError> {
        self.inner.create(comment).await
    }

    async fn update(&self, comment: &Comment) -> Result<(), StorageError> {
        self.inner.update(comment).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.inner.delete(id).await
    }

    async fn delete_by_video(&self, video_id: &str) -> Result<(), StorageError> {
        self.inner.delete_by_video(video_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentary_db_memory::InMemoryCommentStorage;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Wraps the in-memory backend, counting list fetches and optionally
    /// failing them.
    struct CountingStorage {
        inner: InMemoryCommentStorage,
        list_calls: AtomicUsize,
        fail_lists: AtomicBool,
    }

    impl CountingStorage {
        fn new() -> Self {
            Self {
                inner: InMemoryCommentStorage::new(),
                list_calls: AtomicUsize::new(0),
                fail_lists: AtomicBool::new(false),
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn set_fail_lists(&self, fail: bool) {
            self.fail_lists.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CommentStorage for CountingStorage {
        async fn list_by_video(
            &self,
            video_id: &str,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<Comment>, StorageError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            // Keep the fetch in flight long enough for callers to pile up
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(StorageError::connection_error("backend unreachable"));
            }
            self.inner.list_by_video(video_id, limit, offset).await
        }

        async fn create(&self, comment: &NewComment) -> Result<Uuid, StorageError> {
            self.inner.create(comment).await
        }

        async fn update(&self, comment: &Comment) -> Result<(), StorageError> {
            self.inner.update(comment).await
        }

        async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
            self.inner.delete(id).await
        }

        async fn delete_by_video(&self, video_id: &str) -> Result<(), StorageError> {
            self.inner.delete_by_video(video_id).await
        }
    }

    fn cached(
        backend: Arc<CountingStorage>,
        config: CacheConfig,
    ) -> Arc<CachedCommentStorage> {
        Arc::new(CachedCommentStorage::new(
            backend,
            RemoteTier::Disabled,
            config,
        ))
    }

    async fn seed(storage: &CountingStorage, video_id: &str, n: usize) {
        for i in 0..n {
            storage
                .inner
                .create(&NewComment::new(video_id, format!("comment {i}")))
                .await
                .unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stampede_bound_one_fetch_for_concurrent_callers() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 3).await;
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage.list_by_video("v1", 10, 0).await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(backend.list_calls(), 1);
        for result in &results {
            assert_eq!(result, &results[0]);
            assert_eq!(result.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_local_tier_serves_repeat_reads() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 2).await;
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let first = storage.list_by_video("v1", 10, 0).await.unwrap();
        let second = storage.list_by_video("v1", 10, 0).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_pages_are_cached_independently() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 5).await;
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let page0 = storage.list_by_video("v1", 2, 0).await.unwrap();
        let page1 = storage.list_by_video("v1", 2, 2).await.unwrap();

        assert_eq!(backend.list_calls(), 2);
        assert_ne!(page0[0].id, page1[0].id);
    }

    #[tokio::test]
    async fn test_local_ttl_expiry_triggers_refetch() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 1).await;
        let config = CacheConfig {
            local_ttl_secs: 1,
            ..CacheConfig::default()
        };
        let storage = cached(Arc::clone(&backend), config);

        storage.list_by_video("v1", 10, 0).await.unwrap();
        assert_eq!(backend.list_calls(), 1);

        tokio::time::sleep(Duration::from_millis(1200)).await;

        storage.list_by_video("v1", 10, 0).await.unwrap();
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_writes_pass_through_and_do_not_invalidate() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 3).await;
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let cached_list = storage.list_by_video("v1", 10, 0).await.unwrap();
        assert_eq!(cached_list.len(), 3);

        // Write through the decorator; the backend sees it immediately
        storage
            .create(&NewComment::new("v1", "fresh"))
            .await
            .unwrap();
        assert_eq!(
            backend.inner.list_by_video("v1", 10, 0).await.unwrap().len(),
            4
        );

        // The cached list stays stale until TTL; no extra fetch happened
        let still_cached = storage.list_by_video("v1", 10, 0).await.unwrap();
        assert_eq!(still_cached.len(), 3);
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_write_errors_pass_through_unmodified() {
        let backend = Arc::new(CountingStorage::new());
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let err = storage.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
        // Writes never consult the cache or the list path
        assert_eq!(backend.list_calls(), 0);
        assert_eq!(storage.local_entry_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_failure_fans_out_and_is_not_cached() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 2).await;
        backend.set_fail_lists(true);
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage.list_by_video("v1", 10, 0).await
            }));
        }
        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(err, StorageError::ConnectionError { .. }));
        }
        assert_eq!(backend.list_calls(), 1);

        // No negative caching: the next call re-fetches and succeeds
        backend.set_fail_lists(false);
        let listed = storage.list_by_video("v1", 10, 0).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_ordering_preserved_through_cache() {
        let backend = Arc::new(CountingStorage::new());
        seed(&backend, "v1", 4).await;
        let storage = cached(Arc::clone(&backend), CacheConfig::default());

        let direct = backend.inner.list_by_video("v1", 10, 0).await.unwrap();
        let through_cache = storage.list_by_video("v1", 10, 0).await.unwrap();
        let from_cache = storage.list_by_video("v1", 10, 0).await.unwrap();

        assert_eq!(direct, through_cache);
        assert_eq!(direct, from_cache);
    }
}
