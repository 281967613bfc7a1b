//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Comment, CommentId, FriendPair, Friendship, FriendshipId, FriendshipStatus, NewComment,
    NewNotification, NewPost, NewUser, Notification, NotificationId, Post, PostId, PostStats,
    PostUpdate, ProfileUpdate, User, UserId,
};
use crate::domain::pagination::FeedKey;
use crate::domain::ports::{
    EngagementRepository, FeedWindow, FriendshipRepository, NotificationRepository,
    PostRepository, UserRepository,
};
use crate::error::DomainError;

/// Hand out ids above anything seeded by a builder
fn bump(counter: &AtomicI32, seen: i32) {
    counter.fetch_max(seen, Ordering::SeqCst);
}

fn next(counter: &AtomicI32) -> i32 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    last_id: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        bump(&self.last_id, user.id.0);
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.api_key_hash == hash).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(DomainError::AlreadyExists(format!(
                "User with email '{}' already exists",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: UserId(next(&self.last_id)),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            bio: None,
            avatar: None,
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar) = &update.avatar {
            user.avatar = Some(avatar.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: u64,
    ) -> Result<Vec<User>, DomainError> {
        let needle = query.to_lowercase();
        let users = self.users.read().unwrap();
        let mut found: Vec<User> = users
            .values()
            .filter(|u| u.id != *exclude)
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        found.truncate(limit as usize);
        Ok(found)
    }
}

// ============================================================================
// In-Memory Post Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Arc<RwLock<HashMap<PostId, Post>>>,
    last_id: AtomicI32,
    unavailable: bool,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails like a dropped connection
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a post for testing
    pub fn with_post(self, post: Post) -> Self {
        bump(&self.last_id, post.id.0);
        self.posts.write().unwrap().insert(post.id, post);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable {
            return Err(DomainError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        self.check()?;
        let posts = self.posts.read().unwrap();
        Ok(posts.get(id).cloned())
    }

    async fn create(&self, author: &UserId, new_post: &NewPost) -> Result<Post, DomainError> {
        self.check()?;
        let now = Utc::now();
        let post = Post {
            id: PostId(next(&self.last_id)),
            author_id: *author,
            content: new_post.content.clone(),
            image: new_post.image.clone(),
            created_at: now,
            updated_at: now,
        };
        self.posts.write().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<Post, DomainError> {
        self.check()?;
        let mut posts = self.posts.write().unwrap();
        let post = posts
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", id)))?;

        if let Some(content) = &update.content {
            post.content = content.clone();
        }
        if let Some(image) = &update.image {
            post.image = Some(image.clone()).filter(|i| !i.is_empty());
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<bool, DomainError> {
        self.check()?;
        Ok(self.posts.write().unwrap().remove(id).is_some())
    }

    async fn find_feed_window(&self, window: &FeedWindow) -> Result<Vec<Post>, DomainError> {
        self.check()?;
        let authors: Option<HashSet<UserId>> = window
            .authors
            .as_ref()
            .map(|ids| ids.iter().copied().collect());

        let posts = self.posts.read().unwrap();
        let mut rows: Vec<Post> = posts
            .values()
            .filter(|p| authors.as_ref().map_or(true, |a| a.contains(&p.author_id)))
            .filter(|p| {
                window.after.as_ref().map_or(true, |cursor| {
                    FeedKey::new(p.created_at, p.id).is_after(cursor, window.sort)
                })
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            FeedKey::new(a.created_at, a.id).cmp_in(&FeedKey::new(b.created_at, b.id), window.sort)
        });
        rows.truncate(window.fetch);
        Ok(rows)
    }
}

// ============================================================================
// In-Memory Engagement Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEngagementRepository {
    likes: Arc<RwLock<HashSet<(PostId, UserId)>>>,
    comments: Arc<RwLock<HashMap<CommentId, Comment>>>,
    last_comment_id: AtomicI32,
}

impl InMemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a like
    pub fn with_like(self, post: PostId, user: UserId) -> Self {
        self.likes.write().unwrap().insert((post, user));
        self
    }

    /// Pre-populate with a comment
    pub fn with_comment(self, post: PostId, author: UserId, content: &str) -> Self {
        let comment = Comment {
            id: CommentId(next(&self.last_comment_id)),
            post_id: post,
            author_id: author,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.comments.write().unwrap().insert(comment.id, comment);
        self
    }
}

#[async_trait]
impl EngagementRepository for InMemoryEngagementRepository {
    async fn stats_for_posts(
        &self,
        post_ids: &[PostId],
        viewer: &UserId,
    ) -> Result<HashMap<PostId, PostStats>, DomainError> {
        let likes = self.likes.read().unwrap();
        let comments = self.comments.read().unwrap();

        Ok(post_ids
            .iter()
            .map(|id| {
                let stats = PostStats {
                    likes_count: likes.iter().filter(|(p, _)| p == id).count() as i64,
                    comments_count: comments.values().filter(|c| c.post_id == *id).count() as i64,
                    is_liked: likes.contains(&(*id, *viewer)),
                };
                (*id, stats)
            })
            .collect())
    }

    async fn has_liked(&self, post: &PostId, user: &UserId) -> Result<bool, DomainError> {
        Ok(self.likes.read().unwrap().contains(&(*post, *user)))
    }

    async fn add_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError> {
        self.likes.write().unwrap().insert((*post, *user));
        Ok(())
    }

    async fn remove_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError> {
        self.likes.write().unwrap().remove(&(*post, *user));
        Ok(())
    }

    async fn count_likes(&self, post: &PostId) -> Result<i64, DomainError> {
        let likes = self.likes.read().unwrap();
        Ok(likes.iter().filter(|(p, _)| p == post).count() as i64)
    }

    async fn create_comment(&self, new_comment: &NewComment) -> Result<Comment, DomainError> {
        let comment = Comment {
            id: CommentId(next(&self.last_comment_id)),
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            content: new_comment.content.clone(),
            created_at: Utc::now(),
        };
        self.comments
            .write()
            .unwrap()
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        Ok(self.comments.read().unwrap().get(id).cloned())
    }

    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, DomainError> {
        let comments = self.comments.read().unwrap();
        let mut found: Vec<Comment> = comments
            .values()
            .filter(|c| c.post_id == *post)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(found)
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<bool, DomainError> {
        Ok(self.comments.write().unwrap().remove(id).is_some())
    }
}

// ============================================================================
// In-Memory Friendship Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryFriendshipRepository {
    edges: Arc<RwLock<HashMap<FriendshipId, Friendship>>>,
    last_id: AtomicI32,
}

impl InMemoryFriendshipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an accepted friendship requested by `requester`
    pub fn with_friends(self, requester: UserId, addressee: UserId) -> Self {
        self.with_edge(requester, addressee, FriendshipStatus::Accepted)
    }

    /// Pre-populate with a pending request
    pub fn with_pending(self, requester: UserId, addressee: UserId) -> Self {
        self.with_edge(requester, addressee, FriendshipStatus::Pending)
    }

    fn with_edge(self, requester: UserId, addressee: UserId, status: FriendshipStatus) -> Self {
        if let Some(pair) = FriendPair::new(requester, addressee) {
            let now = Utc::now();
            let edge = Friendship {
                id: FriendshipId(next(&self.last_id)),
                pair,
                requester_id: requester,
                status,
                created_at: now,
                updated_at: now,
            };
            self.edges.write().unwrap().insert(edge.id, edge);
        }
        self
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn find_by_id(&self, id: &FriendshipId) -> Result<Option<Friendship>, DomainError> {
        Ok(self.edges.read().unwrap().get(id).cloned())
    }

    async fn find_by_pair(&self, pair: &FriendPair) -> Result<Option<Friendship>, DomainError> {
        let edges = self.edges.read().unwrap();
        Ok(edges.values().find(|e| e.pair == *pair).cloned())
    }

    async fn create_request(
        &self,
        pair: &FriendPair,
        requester: &UserId,
    ) -> Result<Friendship, DomainError> {
        let mut edges = self.edges.write().unwrap();
        if edges.values().any(|e| e.pair == *pair) {
            return Err(DomainError::AlreadyExists(
                "Friendship already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let edge = Friendship {
            id: FriendshipId(next(&self.last_id)),
            pair: *pair,
            requester_id: *requester,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        edges.insert(edge.id, edge.clone());
        Ok(edge)
    }

    async fn set_status(
        &self,
        id: &FriendshipId,
        status: FriendshipStatus,
        requester: &UserId,
    ) -> Result<Friendship, DomainError> {
        let mut edges = self.edges.write().unwrap();
        let edge = edges
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Friendship {} not found", id.0)))?;
        edge.status = status;
        edge.requester_id = *requester;
        edge.updated_at = Utc::now();
        Ok(edge.clone())
    }

    async fn delete(&self, id: &FriendshipId) -> Result<bool, DomainError> {
        Ok(self.edges.write().unwrap().remove(id).is_some())
    }

    async fn find_for_user(
        &self,
        user: &UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, DomainError> {
        let edges = self.edges.read().unwrap();
        let mut found: Vec<Friendship> = edges
            .values()
            .filter(|e| e.status == status && e.pair.contains(*user))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(found)
    }
}

// ============================================================================
// In-Memory Notification Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<HashMap<NotificationId, Notification>>>,
    last_id: AtomicI32,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, new: &NewNotification) -> Result<Notification, DomainError> {
        let notification = Notification {
            id: NotificationId(next(&self.last_id)),
            user_id: new.user_id,
            actor_id: new.actor_id,
            kind: new.kind,
            post_id: new.post_id,
            message: new.message.clone(),
            read: false,
            created_at: Utc::now(),
        };
        self.notifications
            .write()
            .unwrap()
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        Ok(self.notifications.read().unwrap().get(id).cloned())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, DomainError> {
        let notifications = self.notifications.read().unwrap();
        let mut found: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == *user)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<(), DomainError> {
        let mut notifications = self.notifications.write().unwrap();
        match notifications.get_mut(id) {
            Some(n) => {
                n.read = true;
                Ok(())
            }
            None => Err(DomainError::NotFound(format!(
                "Notification {} not found",
                id.0
            ))),
        }
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().unwrap();
        let mut changed = 0;
        for n in notifications
            .values_mut()
            .filter(|n| n.user_id == *user && !n.read)
        {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn count_unread(&self, user: &UserId) -> Result<u64, DomainError> {
        let notifications = self.notifications.read().unwrap();
        Ok(notifications
            .values()
            .filter(|n| n.user_id == *user && !n.read)
            .count() as u64)
    }
}
