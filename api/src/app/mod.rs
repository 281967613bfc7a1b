//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod feed_service;
pub mod friend_service;
pub mod notification_service;
pub mod post_service;
pub mod user_service;

pub use feed_service::{FeedQuery, FeedService};
pub use friend_service::FriendService;
pub use notification_service::NotificationService;
pub use post_service::PostService;
pub use user_service::{hash_api_key, Registration, UserService};
