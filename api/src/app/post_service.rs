//! Post service
//!
//! Post CRUD, likes and comments. Only a post's author may edit or delete
//! it; a comment may be deleted by its author or by the post's author.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    CommentId, CommentView, FeedPost, LikeToggle, NewComment, NewNotification, NewPost,
    NotificationKind, Post, PostId, PostUpdate, User, UserId, UserSummary,
};
use crate::domain::ports::{
    EngagementRepository, NotificationRepository, PostRepository, UserRepository,
};
use crate::error::AppError;

use super::feed_service::annotate_posts;

/// Longest accepted post body
pub const MAX_POST_LENGTH: usize = 5000;

/// Longest accepted comment body
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Service for posts, likes and comments
pub struct PostService<PR, ER, UR, NR>
where
    PR: PostRepository,
    ER: EngagementRepository,
    UR: UserRepository,
    NR: NotificationRepository,
{
    posts: Arc<PR>,
    engagements: Arc<ER>,
    users: Arc<UR>,
    notifications: Arc<NR>,
}

impl<PR, ER, UR, NR> PostService<PR, ER, UR, NR>
where
    PR: PostRepository,
    ER: EngagementRepository,
    UR: UserRepository,
    NR: NotificationRepository,
{
    pub fn new(
        posts: Arc<PR>,
        engagements: Arc<ER>,
        users: Arc<UR>,
        notifications: Arc<NR>,
    ) -> Self {
        Self {
            posts,
            engagements,
            users,
            notifications,
        }
    }

    /// Create a post authored by `viewer`
    pub async fn create(&self, viewer: &User, input: NewPost) -> Result<FeedPost, AppError> {
        let content = input.content.trim().to_string();
        let image = normalize_image(input.image);

        if content.is_empty() && image.is_none() {
            return Err(AppError::BadRequest(
                "Post must have content or an image".to_string(),
            ));
        }
        validate_length(&content, MAX_POST_LENGTH, "Post")?;

        let post = self
            .posts
            .create(&viewer.id, &NewPost { content, image })
            .await?;

        tracing::info!(post_id = %post.id, author = %viewer.id, "Post created");

        Ok(FeedPost::new(post, viewer.summary(), Default::default()))
    }

    /// A single post as seen by `viewer`
    pub async fn get(&self, viewer: &User, id: &PostId) -> Result<FeedPost, AppError> {
        let post = self.find(id).await?;
        self.annotate_one(viewer, post).await
    }

    /// Edit a post; author only
    pub async fn update(
        &self,
        viewer: &User,
        id: &PostId,
        input: PostUpdate,
    ) -> Result<FeedPost, AppError> {
        let post = self.find(id).await?;
        if post.author_id != viewer.id {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        let update = PostUpdate {
            content: input.content.map(|c| c.trim().to_string()),
            image: input.image.map(|i| i.trim().to_string()),
        };

        if let Some(content) = &update.content {
            validate_length(content, MAX_POST_LENGTH, "Post")?;
        }

        let content_after = update.content.as_deref().unwrap_or(&post.content);
        let image_after = match &update.image {
            Some(image) => Some(image.as_str()).filter(|i| !i.is_empty()),
            None => post.image.as_deref(),
        };
        if content_after.is_empty() && image_after.is_none() {
            return Err(AppError::BadRequest(
                "Post must have content or an image".to_string(),
            ));
        }

        let updated = self.posts.update(id, &update).await?;
        self.annotate_one(viewer, updated).await
    }

    /// Delete a post; author only
    pub async fn delete(&self, viewer: &User, id: &PostId) -> Result<(), AppError> {
        let post = self.find(id).await?;
        if post.author_id != viewer.id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        if !self.posts.delete(id).await? {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        tracing::info!(post_id = %id, author = %viewer.id, "Post deleted");
        Ok(())
    }

    /// Like the post if the viewer hasn't, unlike it otherwise
    pub async fn toggle_like(&self, viewer: &User, id: &PostId) -> Result<LikeToggle, AppError> {
        let post = self.find(id).await?;

        let liked = if self.engagements.has_liked(id, &viewer.id).await? {
            self.engagements.remove_like(id, &viewer.id).await?;
            false
        } else {
            self.engagements.add_like(id, &viewer.id).await?;
            if post.author_id != viewer.id {
                self.notify(
                    post.author_id,
                    viewer,
                    NotificationKind::Like,
                    Some(post.id),
                    format!("{} liked your post", viewer.name),
                )
                .await;
            }
            true
        };

        let likes_count = self.engagements.count_likes(id).await?;
        Ok(LikeToggle { liked, likes_count })
    }

    /// Comment on a post
    pub async fn add_comment(
        &self,
        viewer: &User,
        id: &PostId,
        content: &str,
    ) -> Result<CommentView, AppError> {
        let post = self.find(id).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
        }
        validate_length(content, MAX_COMMENT_LENGTH, "Comment")?;

        let comment = self
            .engagements
            .create_comment(&NewComment {
                post_id: post.id,
                author_id: viewer.id,
                content: content.to_string(),
            })
            .await?;

        if post.author_id != viewer.id {
            self.notify(
                post.author_id,
                viewer,
                NotificationKind::Comment,
                Some(post.id),
                format!("{} commented on your post", viewer.name),
            )
            .await;
        }

        Ok(CommentView::new(comment, viewer.summary()))
    }

    /// Comments on a post, newest first
    pub async fn list_comments(&self, id: &PostId) -> Result<Vec<CommentView>, AppError> {
        self.find(id).await?;

        let comments = self.engagements.list_comments(id).await?;

        let mut author_ids: Vec<UserId> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors: HashMap<UserId, UserSummary> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned().unwrap_or_else(|| {
                    UserSummary {
                        id: comment.author_id,
                        name: "Deleted user".to_string(),
                        avatar: None,
                    }
                });
                CommentView::new(comment, author)
            })
            .collect())
    }

    /// Delete a comment; allowed for the comment's author and the post's author
    pub async fn delete_comment(
        &self,
        viewer: &User,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<(), AppError> {
        let post = self.find(post_id).await?;

        let comment = self
            .engagements
            .find_comment(comment_id)
            .await?
            .filter(|c| c.post_id == post.id)
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;

        if comment.author_id != viewer.id && post.author_id != viewer.id {
            return Err(AppError::Forbidden(
                "You can only delete your own comments or comments on your posts".to_string(),
            ));
        }

        self.engagements.delete_comment(comment_id).await?;
        Ok(())
    }

    async fn find(&self, id: &PostId) -> Result<Post, AppError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    async fn annotate_one(&self, viewer: &User, post: Post) -> Result<FeedPost, AppError> {
        annotate_posts(
            self.users.as_ref(),
            self.engagements.as_ref(),
            &viewer.id,
            vec![post],
        )
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("annotation dropped a post".to_string()))
    }

    async fn notify(
        &self,
        recipient: UserId,
        actor: &User,
        kind: NotificationKind,
        post_id: Option<PostId>,
        message: String,
    ) {
        let notification = NewNotification {
            user_id: recipient,
            actor_id: actor.id,
            kind,
            post_id,
            message,
        };
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::warn!(
                error = %e,
                recipient = %recipient,
                kind = %kind,
                "Failed to create notification"
            );
        }
    }
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
}

fn validate_length(text: &str, max: usize, what: &str) -> Result<(), AppError> {
    if text.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            what, max
        )));
    }
    Ok(())
}
