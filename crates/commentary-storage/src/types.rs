//! Core types for the comment storage abstraction layer.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored comment attached to a video.
///
/// The caching layer treats a list of comments as an opaque serializable
/// payload; nothing in this workspace interprets `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier, generated by the backend on create.
    pub id: Uuid,

    /// Identifier of the video this comment belongs to.
    pub video_id: String,

    /// Application-defined comment body.
    pub content: String,

    /// When the comment was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the comment was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Input for creating a new comment.
///
/// The backend generates the identifier and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    /// Identifier of the video the comment belongs to.
    pub video_id: String,

    /// Comment body.
    pub content: String,
}

impl NewComment {
    /// Creates a new comment input.
    #[must_use]
    pub fn new(video_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            content: content.into(),
        }
    }
}
