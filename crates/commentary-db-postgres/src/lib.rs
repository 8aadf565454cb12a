//! PostgreSQL comment storage backend for the commentary service.
//!
//! Implements the `CommentStorage` trait from `commentary-storage` on top of
//! a single `comments` table, with startup migrations and pooled connections.
//!
//! # Example
//!
//! ```ignore
//! use commentary_db_postgres::{PostgresCommentStorage, PostgresConfig};
//!
//! let config = PostgresConfig::new("postgres://localhost/commentary");
//! let storage = PostgresCommentStorage::new(config).await?;
//! ```

mod config;
mod error;
pub mod migrations;
pub mod pool;
mod storage;

pub use commentary_storage::{Comment, CommentStorage, NewComment, StorageError};
pub use config::PostgresConfig;
pub use error::PostgresError;
pub use storage::PostgresCommentStorage;
