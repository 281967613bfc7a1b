//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::{
    Comment, CommentId, FriendPair, Friendship, FriendshipId, FriendshipStatus, NewComment,
    NewNotification, NewPost, NewUser, Notification, NotificationId, Post, PostId, PostStats,
    PostUpdate, ProfileUpdate, User, UserId,
};
use crate::domain::pagination::{FeedKey, FeedSort};
use crate::error::DomainError;

/// Range query for one page of posts
///
/// Rows come back ordered by `(created_at, id)` in `sort` direction,
/// strictly after `after` when set, at most `fetch` of them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedWindow {
    /// Restrict to these authors; `None` means every author
    pub authors: Option<Vec<UserId>>,
    pub after: Option<FeedKey>,
    pub sort: FeedSort,
    pub fetch: usize,
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find several users at once; missing ids are skipped
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Find a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Apply a partial profile update
    async fn update_profile(&self, id: &UserId, update: &ProfileUpdate)
        -> Result<User, DomainError>;

    /// Case-insensitive substring search over name and email
    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: u64,
    ) -> Result<Vec<User>, DomainError>;
}

/// Repository for Post entities
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by ID
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// Create a new post
    async fn create(&self, author: &UserId, post: &NewPost) -> Result<Post, DomainError>;

    /// Update content and/or image
    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<Post, DomainError>;

    /// Delete a post with its likes, comments and notifications.
    /// Returns false if nothing was deleted.
    async fn delete(&self, id: &PostId) -> Result<bool, DomainError>;

    /// Fetch one keyset window of posts
    async fn find_feed_window(&self, window: &FeedWindow) -> Result<Vec<Post>, DomainError>;
}

/// Repository for likes and comments
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Like/comment counts and the viewer's like flag for a batch of posts.
    /// Posts without any engagement may be absent from the map.
    async fn stats_for_posts(
        &self,
        post_ids: &[PostId],
        viewer: &UserId,
    ) -> Result<HashMap<PostId, PostStats>, DomainError>;

    /// Whether `user` has liked `post`
    async fn has_liked(&self, post: &PostId, user: &UserId) -> Result<bool, DomainError>;

    /// Record a like (idempotent)
    async fn add_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError>;

    /// Remove a like (idempotent)
    async fn remove_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError>;

    /// Number of likes on a post
    async fn count_likes(&self, post: &PostId) -> Result<i64, DomainError>;

    /// Create a comment
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DomainError>;

    /// Find a comment by ID
    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, DomainError>;

    /// Comments on a post, newest first
    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, DomainError>;

    /// Delete a comment. Returns false if nothing was deleted.
    async fn delete_comment(&self, id: &CommentId) -> Result<bool, DomainError>;
}

/// Repository for friendship edges
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Find a friendship by ID
    async fn find_by_id(&self, id: &FriendshipId) -> Result<Option<Friendship>, DomainError>;

    /// Find the edge between two users, whatever its status
    async fn find_by_pair(&self, pair: &FriendPair) -> Result<Option<Friendship>, DomainError>;

    /// Create a pending request from `requester` over `pair`
    async fn create_request(
        &self,
        pair: &FriendPair,
        requester: &UserId,
    ) -> Result<Friendship, DomainError>;

    /// Move an edge to `status`, recording `requester` as the sender
    async fn set_status(
        &self,
        id: &FriendshipId,
        status: FriendshipStatus,
        requester: &UserId,
    ) -> Result<Friendship, DomainError>;

    /// Delete an edge. Returns false if nothing was deleted.
    async fn delete(&self, id: &FriendshipId) -> Result<bool, DomainError>;

    /// Edges touching `user` with the given status
    async fn find_for_user(
        &self,
        user: &UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, DomainError>;
}

/// Repository for notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a notification
    async fn create(&self, notification: &NewNotification) -> Result<Notification, DomainError>;

    /// Find a notification by ID
    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError>;

    /// Newest notifications for a user
    async fn list_for_user(
        &self,
        user: &UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Mark one notification as read
    async fn mark_read(&self, id: &NotificationId) -> Result<(), DomainError>;

    /// Mark every unread notification of a user as read; returns how many changed
    async fn mark_all_read(&self, user: &UserId) -> Result<u64, DomainError>;

    /// Number of unread notifications
    async fn count_unread(&self, user: &UserId) -> Result<u64, DomainError>;
}
