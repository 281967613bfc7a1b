//! PostgreSQL adapter for NotificationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{
    NewNotification, Notification, NotificationId, NotificationKind, PostId, UserId,
};
use crate::domain::ports::NotificationRepository;
use crate::entity::notifications;
use crate::entity::prelude::Notifications;
use crate::error::DomainError;

/// PostgreSQL implementation of NotificationRepository
pub struct PostgresNotificationRepository {
    db: DatabaseConnection,
}

impl PostgresNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: &NewNotification) -> Result<Notification, DomainError> {
        let model = notifications::ActiveModel {
            user_id: Set(notification.user_id.0),
            actor_id: Set(notification.actor_id.0),
            kind: Set(notification.kind.to_string()),
            post_id: Set(notification.post_id.map(|p| p.0)),
            message: Set(notification.message.clone()),
            read: Set(false),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.try_into()
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        let result = Notifications::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Notification::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, DomainError> {
        let results = Notifications::find()
            .filter(notifications::Column::UserId.eq(user.0))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<(), DomainError> {
        notifications::ActiveModel {
            id: Set(id.0),
            read: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Notification {} not found", id.0))
            }
            other => DomainError::Database(other.to_string()),
        })?;

        Ok(())
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, DomainError> {
        let result = Notifications::update_many()
            .col_expr(notifications::Column::Read, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user.0))
            .filter(notifications::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    async fn count_unread(&self, user: &UserId) -> Result<u64, DomainError> {
        Notifications::find()
            .filter(notifications::Column::UserId.eq(user.0))
            .filter(notifications::Column::Read.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

impl TryFrom<notifications::Model> for Notification {
    type Error = DomainError;

    fn try_from(model: notifications::Model) -> Result<Self, Self::Error> {
        let kind: NotificationKind = model.kind.parse().map_err(DomainError::Internal)?;

        Ok(Notification {
            id: NotificationId(model.id),
            user_id: UserId(model.user_id),
            actor_id: UserId(model.actor_id),
            kind,
            post_id: model.post_id.map(PostId),
            message: model.message,
            read: model.read,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
