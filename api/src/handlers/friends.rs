//! Friend handlers
//!
//! Friend requests and friend lists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    FriendRequests, Friendship, FriendshipId, FriendshipStatus, User, UserId, UserSummary,
};
use crate::error::AppError;
use crate::AppState;

use super::posts::MessageResponse;

/// A friendship row as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: FriendshipId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Friendship> for FriendshipResponse {
    fn from(friendship: Friendship) -> Self {
        Self {
            id: friendship.id,
            sender_id: friendship.requester_id,
            receiver_id: friendship.addressee(),
            status: friendship.status,
            created_at: friendship.created_at,
            updated_at: friendship.updated_at,
        }
    }
}

/// GET /users/:id/friends
pub async fn list_friends(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let friends = state.friend_service.list_friends(&UserId(id)).await?;
    Ok(Json(friends))
}

/// POST /users/:id/friend-request
///
/// Send a friend request to user `:id`. If they already asked the caller,
/// the two requests meet and the friendship is accepted.
pub async fn send_friend_request(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<FriendshipResponse>), AppError> {
    let friendship = state
        .friend_service
        .send_request(&user, &UserId(id))
        .await?;
    Ok((StatusCode::CREATED, Json(friendship.into())))
}

/// DELETE /users/:id/friend
pub async fn remove_friend(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.friend_service.remove(&user, &UserId(id)).await?;
    Ok(MessageResponse::new("Friend removed"))
}

/// GET /users/friend-requests/all
///
/// Pending requests received by and sent by the caller.
pub async fn list_friend_requests(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<FriendRequests>, AppError> {
    let requests = state.friend_service.list_requests(&user).await?;
    Ok(Json(requests))
}

/// PATCH /users/friend-requests/:id/accept
pub async fn accept_friend_request(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let friendship = state
        .friend_service
        .accept(&user, &FriendshipId(id))
        .await?;
    Ok(Json(friendship.into()))
}

/// PATCH /users/friend-requests/:id/reject
pub async fn reject_friend_request(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let friendship = state
        .friend_service
        .reject(&user, &FriendshipId(id))
        .await?;
    Ok(Json(friendship.into()))
}
