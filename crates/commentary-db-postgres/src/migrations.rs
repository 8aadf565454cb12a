//! Startup migrations for the PostgreSQL storage backend.
//!
//! The schema is a single `comments` table plus the list-query index. All
//! statements are idempotent so they can run unconditionally on startup.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::info;

use crate::error::{PostgresError, Result};

const CREATE_COMMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS comments (
    id UUID PRIMARY KEY,
    video_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

/// Covers the list query: filter by video, order by insertion.
const CREATE_COMMENTS_VIDEO_IDX: &str = r"
CREATE INDEX IF NOT EXISTS comments_video_id_created_at_idx
    ON comments (video_id, created_at, id)";

/// Runs all migrations against the given pool.
pub async fn run(pool: &PgPool) -> Result<()> {
    for statement in [CREATE_COMMENTS_TABLE, CREATE_COMMENTS_VIDEO_IDX] {
        query(statement)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::Migration(e.to_string()))?;
    }

    info!("Comment schema migrations applied");
    Ok(())
}
