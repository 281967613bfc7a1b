//! Notification service
//!
//! Read side of notifications. They are written by the post and friend
//! services as side effects.

use std::sync::Arc;

use crate::domain::entities::{Notification, NotificationId, User};
use crate::domain::ports::NotificationRepository;
use crate::error::AppError;

/// Most notifications returned by a listing
pub const NOTIFICATION_LIST_LIMIT: u64 = 50;

/// Service for reading and acknowledging notifications
pub struct NotificationService<NR>
where
    NR: NotificationRepository,
{
    notifications: Arc<NR>,
}

impl<NR> NotificationService<NR>
where
    NR: NotificationRepository,
{
    pub fn new(notifications: Arc<NR>) -> Self {
        Self { notifications }
    }

    /// The viewer's newest notifications
    pub async fn list(&self, viewer: &User) -> Result<Vec<Notification>, AppError> {
        Ok(self
            .notifications
            .list_for_user(&viewer.id, NOTIFICATION_LIST_LIMIT)
            .await?)
    }

    /// Mark one of the viewer's notifications as read
    pub async fn mark_read(&self, viewer: &User, id: &NotificationId) -> Result<(), AppError> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.user_id != viewer.id {
            return Err(AppError::Forbidden(
                "Notification belongs to another user".to_string(),
            ));
        }

        if !notification.read {
            self.notifications.mark_read(id).await?;
        }
        Ok(())
    }

    /// Mark all of the viewer's notifications as read
    pub async fn mark_all_read(&self, viewer: &User) -> Result<u64, AppError> {
        let updated = self.notifications.mark_all_read(&viewer.id).await?;
        tracing::debug!(user = %viewer.id, updated, "Marked notifications read");
        Ok(updated)
    }

    pub async fn unread_count(&self, viewer: &User) -> Result<u64, AppError> {
        Ok(self.notifications.count_unread(&viewer.id).await?)
    }
}
