//! PostgreSQL implementation of the CommentStorage trait.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use time::OffsetDateTime;
use uuid::Uuid;

use commentary_storage::{Comment, CommentStorage, NewComment, StorageError};

use crate::config::PostgresConfig;
use crate::error::db_error;
use crate::migrations;
use crate::pool;

/// PostgreSQL comment storage backend.
#[derive(Debug, Clone)]
pub struct PostgresCommentStorage {
    pool: PgPool,
}

/// Converts a database row to a Comment.
fn row_to_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        video_id: row.get("video_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
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

impl PostgresCommentStorage {
    /// Creates a new `PostgresCommentStorage` with the given configuration.
    ///
    /// This will create a connection pool and, if configured, run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created or if
    /// migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresCommentStorage` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CommentStorage for PostgresCommentStorage {
    async fn list_by_video(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StorageError> {
        validate_page(limit, offset)?;

        let rows = query(
            "SELECT id, video_id, content, created_at, updated_at \
             FROM comments WHERE video_id = $1 \
             ORDER BY created_at, id LIMIT $2 OFFSET $3",
        )
        .bind(video_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(row_to_comment).collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        query(
            "INSERT INTO comments (id, video_id, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&comment.video_id)
        .bind(&comment.content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(id)
    }

    async fn update(&self, comment: &Comment) -> Result<(), StorageError> {
        let result = query("UPDATE comments SET content = $2, updated_at = $3 WHERE id = $1")
            .bind(comment.id)
            .bind(&comment.content)
            .bind(OffsetDateTime::now_utc())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(comment.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let result = query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn delete_by_video(&self, video_id: &str) -> Result<(), StorageError> {
        query("DELETE FROM comments WHERE video_id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
