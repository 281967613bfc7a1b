//! SeaORM entities for the tables in `migrations/0001_init.sql`

pub mod prelude;

pub mod comments;
pub mod friendships;
pub mod likes;
pub mod notifications;
pub mod posts;
pub mod users;
