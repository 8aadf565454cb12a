//! Opaque payload codec for cached comment lists.
//!
//! Cached entries are MessagePack-encoded `Vec<Comment>` blobs. A payload
//! that fails to decode is treated as a cache miss by the caller; the next
//! successful fill overwrites the corrupt entry.

use commentary_storage::Comment;

/// Encodes a comment list for storage in a cache tier.
pub fn encode_comments(comments: &[Comment]) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec(comments)
}

/// Decodes a cached comment list payload.
pub fn decode_comments(bytes: &[u8]) -> Result<Vec<Comment>, rmp_serde::decode::Error> {
    rmp_serde::from_slice(bytes)
}
