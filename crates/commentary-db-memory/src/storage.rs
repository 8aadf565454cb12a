//! In-memory comment storage backend using papaya lock-free HashMap.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use commentary_storage::{Comment, CommentStorage, NewComment, StorageError};

/// A stored comment plus its insertion sequence number.
///
/// The sequence number gives the backend a stable list order regardless of
/// timestamp resolution.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    comment: Comment,
}

/// In-memory comment storage backend.
///
/// Provides lock-free concurrent access via `papaya::HashMap`. Intended for
/// tests and single-process deployments; data does not survive a restart.
#[derive(Debug)]
pub struct InMemoryCommentStorage {
    data: Arc<PapayaHashMap<Uuid, Entry>>,
    /// Atomic counter for insertion sequence numbers.
    seq_counter: AtomicU64,
}

impl InMemoryCommentStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            seq_counter: AtomicU64::new(1),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of comments currently stored, across all videos.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    /// Returns `true` if no comments are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCommentStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_page(limit: i64, offset: i64) -> Result<(), StorageError> {
    if limit < 0 {
        return Err(StorageError::invalid_query(format!(
            "limit must be non-negative, got {limit}"
        )));
    }
    if offset < 0 {
        return Err(StorageError::invalid_query(format!(
            "offset must be non-negative, got {offset}"
        )));
    }
    Ok(())
}

#[async_trait]
impl CommentStorage for InMemoryCommentStorage {
    async fn list_by_video(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StorageError> {
        validate_page(limit, offset)?;

        let mut entries: Vec<Entry> = {
            let guard = self.data.pin();
            guard
                .iter()
                .map(|(_, entry)| entry)
                .filter(|entry| entry.comment.video_id == video_id)
                .cloned()
                .collect()
        };

        // Insertion order, stable across timestamp collisions
        entries.sort_by_key(|entry| entry.seq);

        Ok(entries
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|entry| entry.comment)
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let entry = Entry {
            seq: self.next_seq(),
            comment: Comment {
                id,
                video_id: comment.video_id.clone(),
                content: comment.content.clone(),
                created_at: now,
                updated_at: now,
            },
        };

        self.data.pin().insert(id, entry);
        Ok(id)
    }

    async fn update(&self, comment: &Comment) -> Result<(), StorageError> {
        let guard = self.data.pin();
        let existing = guard
            .get(&comment.id)
            .ok_or_else(|| StorageError::not_found(comment.id.to_string()))?;

        let updated = Entry {
            seq: existing.seq,
            comment: Comment {
                id: comment.id,
                video_id: existing.comment.video_id.clone(),
                content: comment.content.clone(),
                created_at: existing.comment.created_at,
                updated_at: OffsetDateTime::now_utc(),
            },
        };
        guard.insert(comment.id, updated);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        match self.data.pin().remove(&id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(id.to_string())),
        }
    }

    async fn delete_by_video(&self, video_id: &str) -> Result<(), StorageError> {
        let guard = self.data.pin();
        let ids: Vec<Uuid> = guard
            .iter()
            .filter(|(_, entry)| entry.comment.video_id == video_id)
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            guard.remove(&id);
        }
        Ok(())
    }
}
