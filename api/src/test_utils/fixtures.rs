//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{DateTime, TimeZone, Utc};

use crate::app::hash_api_key;
use crate::domain::entities::{Post, PostId, User, UserId};

/// Fixed instant tests build timelines around
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Create a test user; the email is derived from the id so name searches
/// never match it
pub fn test_user(id: i32, name: &str) -> User {
    User {
        id: UserId(id),
        email: format!("user{}@example.com", id),
        name: name.to_string(),
        bio: None,
        avatar: None,
        api_key_hash: hash_api_key(&format!("ck-test-{}", id)),
        created_at: base_time(),
        updated_at: base_time(),
    }
}

/// Create a text post by `author` at a given instant
pub fn test_post_at(id: i32, author: UserId, at: DateTime<Utc>) -> Post {
    Post {
        id: PostId(id),
        author_id: author,
        content: format!("post {}", id),
        image: None,
        created_at: at,
        updated_at: at,
    }
}
