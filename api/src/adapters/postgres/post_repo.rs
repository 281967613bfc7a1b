//! PostgreSQL adapter for PostRepository
//!
//! Feed windows are keyset queries over `(created_at, id)`, served by the
//! `posts_created_at_id_idx` index.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{NewPost, Post, PostId, PostUpdate, UserId};
use crate::domain::pagination::{FeedKey, FeedSort};
use crate::domain::ports::{FeedWindow, PostRepository};
use crate::entity::posts;
use crate::entity::prelude::Posts;
use crate::error::DomainError;

/// PostgreSQL implementation of PostRepository
pub struct PostgresPostRepository {
    db: DatabaseConnection,
}

impl PostgresPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Rows strictly past `cursor` in `sort` direction
fn after_cursor(cursor: &FeedKey, sort: FeedSort) -> Condition {
    let at = cursor.created_at.fixed_offset();
    let id = cursor.id.0;
    match sort {
        FeedSort::Latest => Condition::any()
            .add(posts::Column::CreatedAt.lt(at))
            .add(
                Condition::all()
                    .add(posts::Column::CreatedAt.eq(at))
                    .add(posts::Column::Id.lt(id)),
            ),
        FeedSort::Oldest => Condition::any()
            .add(posts::Column::CreatedAt.gt(at))
            .add(
                Condition::all()
                    .add(posts::Column::CreatedAt.eq(at))
                    .add(posts::Column::Id.gt(id)),
            ),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let result = Posts::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, author: &UserId, post: &NewPost) -> Result<Post, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = posts::ActiveModel {
            author_id: Set(author.0),
            content: Set(post.content.clone()),
            image: Set(post.image.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<Post, DomainError> {
        let mut model = posts::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(content) = &update.content {
            model.content = Set(content.clone());
        }
        if let Some(image) = &update.image {
            // an empty image clears it
            model.image = Set(Some(image.clone()).filter(|i| !i.is_empty()));
        }

        let result = model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Post {} not found", id))
            }
            other => DomainError::Database(other.to_string()),
        })?;

        Ok(result.into())
    }

    async fn delete(&self, id: &PostId) -> Result<bool, DomainError> {
        // likes, comments and notifications go with it via ON DELETE CASCADE
        let result = Posts::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_feed_window(&self, window: &FeedWindow) -> Result<Vec<Post>, DomainError> {
        let mut query = Posts::find();

        if let Some(authors) = &window.authors {
            if authors.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(posts::Column::AuthorId.is_in(authors.iter().map(|a| a.0)));
        }

        if let Some(cursor) = &window.after {
            query = query.filter(after_cursor(cursor, window.sort));
        }

        query = match window.sort {
            FeedSort::Latest => query
                .order_by_desc(posts::Column::CreatedAt)
                .order_by_desc(posts::Column::Id),
            FeedSort::Oldest => query
                .order_by_asc(posts::Column::CreatedAt)
                .order_by_asc(posts::Column::Id),
        };

        let results = query
            .limit(window.fetch as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

impl From<posts::Model> for Post {
    fn from(model: posts::Model) -> Self {
        Post {
            id: PostId(model.id),
            author_id: UserId(model.author_id),
            content: model.content,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
