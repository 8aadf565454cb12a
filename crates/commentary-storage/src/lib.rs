//! # commentary-storage
//!
//! Storage abstraction layer for the commentary service.
//!
//! This crate defines the traits and types that all comment storage backends
//! must implement. It does not contain any implementations - those are
//! provided by separate crates (`commentary-db-memory`,
//! `commentary-db-postgres`), and the read-through caching decorator lives in
//! `commentary-cache`.
//!
//! ## Overview
//!
//! The main trait is [`CommentStorage`], which defines the contract for:
//! - Listing comments for a video with pagination
//! - Create / update / delete of single comments
//! - Bulk delete of all comments for a video
//!
//! ## Example
//!
//! ```ignore
//! use commentary_storage::{CommentStorage, NewComment, StorageError};
//!
//! async fn post_comment(
//!     storage: &dyn CommentStorage,
//!     video_id: &str,
//!     content: &str,
//! ) -> Result<uuid::Uuid, StorageError> {
//!     storage.create(&NewComment::new(video_id, content)).await
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::CommentStorage;
pub use types::{Comment, NewComment};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shareable storage trait object.
pub type DynCommentStorage = std::sync::Arc<dyn CommentStorage>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use commentary_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::CommentStorage;
    pub use crate::types::{Comment, NewComment};
    pub use crate::{DynCommentStorage, StorageResult};
}
