//! PostgreSQL adapter for FriendshipRepository
//!
//! Each unordered pair is one row with `user_low < user_high`, so a request
//! and its reverse collide on the unique key instead of creating two edges.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::entities::{FriendPair, Friendship, FriendshipId, FriendshipStatus, UserId};
use crate::domain::ports::FriendshipRepository;
use crate::entity::friendships;
use crate::entity::prelude::Friendships;
use crate::error::DomainError;

/// PostgreSQL implementation of FriendshipRepository
pub struct PostgresFriendshipRepository {
    db: DatabaseConnection,
}

impl PostgresFriendshipRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FriendshipRepository for PostgresFriendshipRepository {
    async fn find_by_id(&self, id: &FriendshipId) -> Result<Option<Friendship>, DomainError> {
        let result = Friendships::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Friendship::try_from).transpose()
    }

    async fn find_by_pair(&self, pair: &FriendPair) -> Result<Option<Friendship>, DomainError> {
        let result = Friendships::find()
            .filter(friendships::Column::UserLow.eq(pair.low().0))
            .filter(friendships::Column::UserHigh.eq(pair.high().0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Friendship::try_from).transpose()
    }

    async fn create_request(
        &self,
        pair: &FriendPair,
        requester: &UserId,
    ) -> Result<Friendship, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = friendships::ActiveModel {
            user_low: Set(pair.low().0),
            user_high: Set(pair.high().0),
            requester_id: Set(requester.0),
            status: Set(FriendshipStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") {
                DomainError::AlreadyExists("Friendship already exists".to_string())
            } else {
                DomainError::Database(msg)
            }
        })?;

        result.try_into()
    }

    async fn set_status(
        &self,
        id: &FriendshipId,
        status: FriendshipStatus,
        requester: &UserId,
    ) -> Result<Friendship, DomainError> {
        let model = friendships::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            requester_id: Set(requester.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Friendship {} not found", id))
            }
            other => DomainError::Database(other.to_string()),
        })?;

        result.try_into()
    }

    async fn delete(&self, id: &FriendshipId) -> Result<bool, DomainError> {
        let result = Friendships::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_for_user(
        &self,
        user: &UserId,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>, DomainError> {
        let results = Friendships::find()
            .filter(friendships::Column::Status.eq(status.to_string()))
            .filter(
                Condition::any()
                    .add(friendships::Column::UserLow.eq(user.0))
                    .add(friendships::Column::UserHigh.eq(user.0)),
            )
            .order_by_desc(friendships::Column::CreatedAt)
            .order_by_desc(friendships::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Friendship::try_from).collect()
    }
}

impl TryFrom<friendships::Model> for Friendship {
    type Error = DomainError;

    fn try_from(model: friendships::Model) -> Result<Self, Self::Error> {
        let pair = FriendPair::new(UserId(model.user_low), UserId(model.user_high)).ok_or_else(
            || DomainError::Internal(format!("friendship {} links a user to itself", model.id)),
        )?;
        let status: FriendshipStatus = model.status.parse().map_err(DomainError::Internal)?;

        Ok(Friendship {
            id: FriendshipId(model.id),
            pair,
            requester_id: UserId(model.requester_id),
            status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}
