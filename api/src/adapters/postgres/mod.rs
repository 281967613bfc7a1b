//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod engagement_repo;
pub mod friendship_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod user_repo;


pub use engagement_repo::PostgresEngagementRepository;
pub use friendship_repo::PostgresFriendshipRepository;
pub use notification_repo::PostgresNotificationRepository;
pub use post_repo::PostgresPostRepository;
pub use user_repo::PostgresUserRepository;
