//! Cache key derivation for comment list queries.

/// Derives the cache key for a comment list query.
///
/// Format: `comments:{video_id}:{limit}:{offset}`.
///
/// The two trailing components are decimal renderings and can never contain
/// the `:` delimiter, so the key parses unambiguously right-to-left: distinct
/// `(video_id, limit, offset)` triples always produce distinct keys, even
/// when the video id itself contains `:`.
#[must_use]
pub fn list_comments_key(video_id: &str, limit: i64, offset: i64) -> String {
    format!("comments:{video_id}:{limit}:{offset}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(
            list_comments_key("v1", 10, 0),
            list_comments_key("v1", 10, 0)
        );
        assert_eq!(list_comments_key("v1", 10, 0), "comments:v1:10:0");
    }

    #[test]
    fn test_distinct_triples_give_distinct_keys() {
        let keys = [
            list_comments_key("v1", 10, 0),
            list_comments_key("v1", 10, 1),
            list_comments_key("v1", 11, 0),
            list_comments_key("v2", 10, 0),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_video_id_containing_delimiter_cannot_collide() {
        // ("v:1", 0, 0) vs ("v", 1, 0): the numeric tail disambiguates
        assert_ne!(
            list_comments_key("v:1", 0, 0),
            list_comments_key("v", 1, 0)
        );
        assert_ne!(
            list_comments_key("v:10", 0, 0),
            list_comments_key("v", 10, 0)
        );
    }
}
