//! User service
//!
//! Handles user registration, API key authentication, and profile management.

use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::{NewUser, ProfileUpdate, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

/// Most results a user search returns
pub const SEARCH_LIMIT: u64 = 20;

/// Request body for registration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Registration {
    pub email: String,
    pub name: String,
}

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Register a new user
    ///
    /// Returns (user, api_key) - the key is only shown once
    pub async fn register(&self, input: Registration) -> Result<(User, String), AppError> {
        let email = input.email.trim().to_lowercase();
        let name = input.name.trim().to_string();

        if !is_plausible_email(&email) {
            return Err(AppError::BadRequest("A valid email is required".to_string()));
        }
        validate_name(&name)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with email '{}' already exists",
                email
            ))));
        }

        let api_key = generate_api_key();
        let user = self
            .users
            .create(&NewUser {
                email,
                name,
                api_key_hash: hash_api_key(&api_key),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok((user, api_key))
    }

    /// Find a user by their API key hash
    pub async fn find_by_api_key(&self, api_key_hash: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_api_key_hash(api_key_hash).await?)
    }

    /// Public profile of a user
    pub async fn get(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Update the viewer's own profile
    pub async fn update_profile(
        &self,
        viewer: &User,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        if viewer.id != *id {
            return Err(AppError::Forbidden(
                "You can only update your own profile".to_string(),
            ));
        }

        let update = ProfileUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            bio: update.bio.map(|b| b.trim().to_string()),
            avatar: update.avatar.map(|a| a.trim().to_string()),
        };

        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        if update.is_empty() {
            return Ok(viewer.clone());
        }

        Ok(self.users.update_profile(id, &update).await?)
    }

    /// Search other users by name or email
    pub async fn search(&self, viewer: &User, query: &str) -> Result<Vec<User>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.users.search(query, &viewer.id, SEARCH_LIMIT).await?)
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.chars().count() > 50 {
        return Err(AppError::BadRequest(
            "Name must be between 1 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("ck-{}", hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}
