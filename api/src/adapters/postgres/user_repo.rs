//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{NewUser, ProfileUpdate, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::entity::prelude::Users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = Users::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Users::find()
            .filter(users::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = Users::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Email))).eq(email.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let result = Users::find()
            .filter(users::Column::ApiKeyHash.eq(hash))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            bio: Set(None),
            avatar: Set(None),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("users_email_lower_idx") || msg.contains("duplicate key") {
                DomainError::AlreadyExists(format!(
                    "User with email '{}' already exists",
                    user.email
                ))
            } else {
                DomainError::Database(msg)
            }
        })?;

        Ok(result.into())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut model = users::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(bio) = &update.bio {
            model.bio = Set(Some(bio.clone()));
        }
        if let Some(avatar) = &update.avatar {
            model.avatar = Set(Some(avatar.clone()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => {
                    DomainError::NotFound(format!("User {} not found", id))
                }
                other => DomainError::Database(other.to_string()),
            })?;

        Ok(result.into())
    }

    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: u64,
    ) -> Result<Vec<User>, DomainError> {
        let pattern = like_pattern(query);

        let results = Users::find()
            .filter(users::Column::Id.ne(exclude.0))
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(users::Column::Name))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(users::Column::Email))).like(&pattern)),
            )
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            email: model.email,
            name: model.name,
            bio: model.bio,
            avatar: model.avatar,
            api_key_hash: model.api_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
