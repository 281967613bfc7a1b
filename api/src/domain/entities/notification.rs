//! Notification domain entity
//!
//! Notifications are written as a side effect of likes, comments and friend
//! requests, and read back by their recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

/// Unique identifier for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub i32);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What triggered the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    FriendRequest,
    FriendAccepted,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Like => write!(f, "like"),
            NotificationKind::Comment => write!(f, "comment"),
            NotificationKind::FriendRequest => write!(f, "friend_request"),
            NotificationKind::FriendAccepted => write!(f, "friend_accepted"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(NotificationKind::Like),
            "comment" => Ok(NotificationKind::Comment),
            "friend_request" => Ok(NotificationKind::FriendRequest),
            "friend_accepted" => Ok(NotificationKind::FriendAccepted),
            _ => Err(format!("Unknown notification kind: {}", s)),
        }
    }
}

/// A notification addressed to one user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub actor_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub post_id: Option<PostId>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a new notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub actor_id: UserId,
    pub kind: NotificationKind,
    pub post_id: Option<PostId>,
    pub message: String,
}
