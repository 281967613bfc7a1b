//! Post handlers
//!
//! Post CRUD, likes and comments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    CommentId, CommentView, FeedPost, LikeToggle, NewPost, PostId, PostUpdate, User,
};
use crate::error::AppError;
use crate::AppState;

/// Request body for POST /posts/:id/comments
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

/// Body returned by deletions
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<NewPost>,
) -> Result<(StatusCode, Json<FeedPost>), AppError> {
    let post = state.post_service.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<FeedPost>, AppError> {
    let post = state.post_service.get(&user, &PostId(id)).await?;
    Ok(Json(post))
}

/// PUT /posts/:id
///
/// Author only. An empty `image` removes the image.
pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    Json(request): Json<PostUpdate>,
) -> Result<Json<FeedPost>, AppError> {
    let post = state
        .post_service
        .update(&user, &PostId(id), request)
        .await?;
    Ok(Json(post))
}

/// DELETE /posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.post_service.delete(&user, &PostId(id)).await?;
    Ok(MessageResponse::new("Post deleted"))
}

/// PATCH /posts/:id/like
///
/// Likes the post, or removes the like if already present.
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<LikeToggle>, AppError> {
    let result = state.post_service.toggle_like(&user, &PostId(id)).await?;
    Ok(Json(result))
}

/// GET /posts/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    let comments = state.post_service.list_comments(&PostId(id)).await?;
    Ok(Json(comments))
}

/// POST /posts/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let comment = state
        .post_service
        .add_comment(&user, &PostId(id), &request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /posts/:id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .post_service
        .delete_comment(&user, &PostId(post_id), &CommentId(comment_id))
        .await?;
    Ok(MessageResponse::new("Comment deleted"))
}
