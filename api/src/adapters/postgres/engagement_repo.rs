//! PostgreSQL adapter for EngagementRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{Comment, CommentId, NewComment, PostId, PostStats, UserId};
use crate::domain::ports::EngagementRepository;
use crate::entity::{comments, likes};
use crate::entity::prelude::{Comments, Likes};
use crate::error::DomainError;

/// PostgreSQL implementation of EngagementRepository
pub struct PostgresEngagementRepository {
    db: DatabaseConnection,
}

impl PostgresEngagementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EngagementRepository for PostgresEngagementRepository {
    async fn stats_for_posts(
        &self,
        post_ids: &[PostId],
        viewer: &UserId,
    ) -> Result<HashMap<PostId, PostStats>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i32> = post_ids.iter().map(|p| p.0).collect();

        let like_counts: Vec<(i32, i64)> = Likes::find()
            .select_only()
            .column(likes::Column::PostId)
            .column_as(Expr::col(likes::Column::Id).count(), "count")
            .filter(likes::Column::PostId.is_in(ids.clone()))
            .group_by(likes::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let comment_counts: Vec<(i32, i64)> = Comments::find()
            .select_only()
            .column(comments::Column::PostId)
            .column_as(Expr::col(comments::Column::Id).count(), "count")
            .filter(comments::Column::PostId.is_in(ids.clone()))
            .group_by(comments::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let liked_by_viewer: Vec<i32> = Likes::find()
            .select_only()
            .column(likes::Column::PostId)
            .filter(likes::Column::PostId.is_in(ids))
            .filter(likes::Column::UserId.eq(viewer.0))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stats: HashMap<PostId, PostStats> = HashMap::new();
        for (post_id, count) in like_counts {
            stats.entry(PostId(post_id)).or_default().likes_count = count;
        }
        for (post_id, count) in comment_counts {
            stats.entry(PostId(post_id)).or_default().comments_count = count;
        }
        for post_id in liked_by_viewer {
            stats.entry(PostId(post_id)).or_default().is_liked = true;
        }

        Ok(stats)
    }

    async fn has_liked(&self, post: &PostId, user: &UserId) -> Result<bool, DomainError> {
        let count = Likes::find()
            .filter(likes::Column::PostId.eq(post.0))
            .filter(likes::Column::UserId.eq(user.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn add_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError> {
        let model = likes::ActiveModel {
            post_id: Set(post.0),
            user_id: Set(user.0),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        Likes::insert(model)
            .on_conflict(
                OnConflict::columns([likes::Column::PostId, likes::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn remove_like(&self, post: &PostId, user: &UserId) -> Result<(), DomainError> {
        Likes::delete_many()
            .filter(likes::Column::PostId.eq(post.0))
            .filter(likes::Column::UserId.eq(user.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count_likes(&self, post: &PostId) -> Result<i64, DomainError> {
        let count = Likes::find()
            .filter(likes::Column::PostId.eq(post.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let model = comments::ActiveModel {
            post_id: Set(comment.post_id.0),
            author_id: Set(comment.author_id.0),
            content: Set(comment.content.clone()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        let result = Comments::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, DomainError> {
        let results = Comments::find()
            .filter(comments::Column::PostId.eq(post.0))
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<bool, DomainError> {
        let result = Comments::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

impl From<comments::Model> for Comment {
    fn from(model: comments::Model) -> Self {
        Comment {
            id: CommentId(model.id),
            post_id: PostId(model.post_id),
            author_id: UserId(model.author_id),
            content: model.content,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
