//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod feed;
pub mod friends;
pub mod notifications;
pub mod posts;
pub mod users;

pub use feed::{get_feed, get_user_posts};
pub use friends::{
    accept_friend_request, list_friend_requests, list_friends, reject_friend_request,
    remove_friend, send_friend_request,
};
pub use notifications::{list_notifications, mark_all_read, mark_read, unread_count};
pub use posts::{
    add_comment, create_post, delete_comment, delete_post, get_post, list_comments, toggle_like,
    update_post,
};
pub use users::{get_user, register, search_users, update_user};
