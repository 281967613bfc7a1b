//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod comment;
pub mod friendship;
pub mod notification;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentId, CommentView, NewComment};
pub use friendship::{
    FriendPair, FriendRequestView, FriendRequests, Friendship, FriendshipId, FriendshipStatus,
};
pub use notification::{NewNotification, Notification, NotificationId, NotificationKind};
pub use post::{FeedPost, LikeToggle, NewPost, Post, PostId, PostStats, PostUpdate};
pub use user::{NewUser, ProfileUpdate, User, UserId, UserSummary};
