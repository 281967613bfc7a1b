//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;

pub use postgres::{
    PostgresEngagementRepository, PostgresFriendshipRepository, PostgresNotificationRepository,
    PostgresPostRepository, PostgresUserRepository,
};
