//! In-memory comment storage backend for the commentary service.
//!
//! This crate provides an in-memory implementation of the `CommentStorage`
//! trait from `commentary-storage`, using papaya lock-free HashMap for
//! concurrent access. Intended for tests and single-process deployments.
//!
//! # Example
//!
//! ```ignore
//! use commentary_db_memory::InMemoryCommentStorage;
//! use commentary_storage::{CommentStorage, NewComment};
//!
//! let storage = InMemoryCommentStorage::new();
//! let id = storage.create(&NewComment::new("v1", "first!")).await?;
//! let page = storage.list_by_video("v1", 10, 0).await?;
//! ```

mod storage;

// Re-export the CommentStorage trait for convenience
pub use commentary_storage::{Comment, CommentStorage, NewComment, StorageError};
pub use storage::InMemoryCommentStorage;

/// Creates a new shareable in-memory storage instance.
pub fn create_storage() -> commentary_storage::DynCommentStorage {
    std::sync::Arc::new(InMemoryCommentStorage::new())
}
