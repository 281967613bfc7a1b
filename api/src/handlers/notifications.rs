//! Notification handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::domain::entities::{Notification, NotificationId, User};
use crate::error::AppError;
use crate::AppState;

use super::posts::MessageResponse;

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub message: String,
    pub updated: u64,
}

/// GET /notifications
///
/// The caller's 50 newest notifications.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.notification_service.list(&user).await?;
    Ok(Json(notifications))
}

/// PATCH /notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .notification_service
        .mark_read(&user, &NotificationId(id))
        .await?;
    Ok(MessageResponse::new("Notification marked as read"))
}

/// PATCH /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ReadAllResponse>, AppError> {
    let updated = state.notification_service.mark_all_read(&user).await?;
    Ok(Json(ReadAllResponse {
        message: "All notifications marked as read".to_string(),
        updated,
    }))
}

/// GET /notifications/unread/count
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let count = state.notification_service.unread_count(&user).await?;
    Ok(Json(UnreadCountResponse { count }))
}
