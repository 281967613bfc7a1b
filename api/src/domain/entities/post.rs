//! Post domain entity
//!
//! Posts are the unit of the feed. Like and comment counts are never stored
//! on the post itself; they are computed per query and attached through
//! [`FeedPost`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserId, UserSummary};

/// Unique, monotonically increasing post identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub i32);

impl From<i32> for PostId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new post
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
}

/// Author-only edit of a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub image: Option<String>,
}

/// Per-post engagement numbers computed at query time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub likes_count: i64,
    pub comments_count: i64,
    /// Whether the requesting viewer has liked the post
    pub is_liked: bool,
}

/// A post as returned to a specific viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: PostId,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: UserSummary,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

impl FeedPost {
    pub fn new(post: Post, author: UserSummary, stats: PostStats) -> Self {
        Self {
            id: post.id,
            content: post.content,
            image: post.image,
            created_at: post.created_at,
            updated_at: post.updated_at,
            author,
            likes_count: stats.likes_count,
            comments_count: stats.comments_count,
            is_liked: stats.is_liked,
        }
    }
}

/// Outcome of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: i64,
}
