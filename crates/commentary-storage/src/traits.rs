//! Storage traits for the comment storage abstraction layer.
//!
//! This module defines the capability set that all comment storage backends
//! must implement.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{Comment, NewComment};

/// The capability set all comment storage backends must implement.
///
/// Implementations must be thread-safe (`Send + Sync`). The caching
/// decorator in `commentary-cache` wraps any implementation of this trait
/// and exposes the identical capability set, so callers are agnostic to
/// whether they talk to a backend directly or through the cache.
///
/// No operation retries internally; retry policy, if any, belongs to the
/// backend's own transport layer.
///
/// # Example
///
/// ```ignore
/// use commentary_storage::{CommentStorage, StorageError};
///
/// async fn first_page(
///     storage: &dyn CommentStorage,
///     video_id: &str,
/// ) -> Result<Vec<Comment>, StorageError> {
///     storage.list_by_video(video_id, 10, 0).await
/// }
/// ```
#[async_trait]
pub trait CommentStorage: Send + Sync {
    /// Lists comments for a video, ordered, with pagination.
    ///
    /// `limit` and `offset` must be non-negative. Ordering is defined by the
    /// backend (both provided backends order by creation time, then id) and
    /// must be preserved by any wrapper.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuery` for negative `limit` or `offset`.
    /// Returns an error for infrastructure issues; an empty page is not an
    /// error.
    async fn list_by_video(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StorageError>;

    /// Creates a new comment and returns its generated identifier.
    async fn create(&self, comment: &NewComment) -> Result<Uuid, StorageError>;

    /// Updates an existing comment, identified by its own `id` field.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the comment does not exist.
    async fn update(&self, comment: &Comment) -> Result<(), StorageError>;

    /// Deletes a comment by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the comment does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;

    /// Deletes all comments for a video.
    ///
    /// Idempotent: succeeds even when no comments matched.
    async fn delete_by_video(&self, video_id: &str) -> Result<(), StorageError>;
}
