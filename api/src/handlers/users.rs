//! User handlers
//!
//! Registration, profiles and user search.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::Registration;
use crate::domain::entities::{ProfileUpdate, User, UserId};
use crate::error::AppError;
use crate::AppState;

/// Response body for registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: User,
    /// API key for authenticated calls (Authorization: Bearer <api_key>)
    pub api_key: String,
    pub message: String,
}

/// Query parameters for GET /users/search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /users/register
///
/// Register a new user. The API key is only shown once.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<Registration>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (user, api_key) = state.user_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            api_key,
            message: "Save this API key - it won't be shown again.".to_string(),
        }),
    ))
}

/// GET /users/search?q=
pub async fn search_users(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.user_service.search(&user, &query.q).await?;
    Ok(Json(users))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, AppError> {
    let user = state.user_service.get(&UserId(id)).await?;
    Ok(Json(user))
}

/// PUT /users/:id
///
/// Only the user themselves may update their profile.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    Json(request): Json<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    let updated = state
        .user_service
        .update_profile(&user, &UserId(id), request)
        .await?;
    Ok(Json(updated))
}
