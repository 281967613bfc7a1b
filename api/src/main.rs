//! Circle API Server
//!
//! Backend for a small social network: posts, likes, comments, friendships
//! and notifications, with a cursor-paged feed.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresEngagementRepository, PostgresFriendshipRepository, PostgresNotificationRepository,
    PostgresPostRepository, PostgresUserRepository,
};
use app::{FeedService, FriendService, NotificationService, PostService, UserService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub feed_service: Arc<
        FeedService<
            PostgresPostRepository,
            PostgresEngagementRepository,
            PostgresFriendshipRepository,
            PostgresUserRepository,
        >,
    >,
    pub post_service: Arc<
        PostService<
            PostgresPostRepository,
            PostgresEngagementRepository,
            PostgresUserRepository,
            PostgresNotificationRepository,
        >,
    >,
    pub friend_service: Arc<
        FriendService<
            PostgresFriendshipRepository,
            PostgresUserRepository,
            PostgresNotificationRepository,
        >,
    >,
    pub notification_service: Arc<NotificationService<PostgresNotificationRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,circle_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Circle API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let state = app_state(db, config.clone());

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited routes (registration)
    let rate_limited_routes = Router::new()
        .route("/users/register", post(handlers::register))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .merge(rate_limited_routes)
        .merge(protected_routes(&state))
        // Middleware
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Wire the Postgres adapters into the application services
fn app_state(db: DatabaseConnection, config: Config) -> AppState {
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(db.clone()));
    let engagement_repo = Arc::new(PostgresEngagementRepository::new(db.clone()));
    let friendship_repo = Arc::new(PostgresFriendshipRepository::new(db.clone()));
    let notification_repo = Arc::new(PostgresNotificationRepository::new(db));

    AppState {
        user_service: Arc::new(UserService::new(user_repo.clone())),
        feed_service: Arc::new(FeedService::new(
            post_repo.clone(),
            engagement_repo.clone(),
            friendship_repo.clone(),
            user_repo.clone(),
        )),
        post_service: Arc::new(PostService::new(
            post_repo,
            engagement_repo,
            user_repo.clone(),
            notification_repo.clone(),
        )),
        friend_service: Arc::new(FriendService::new(
            friendship_repo,
            user_repo,
            notification_repo.clone(),
        )),
        notification_service: Arc::new(NotificationService::new(notification_repo)),
        config,
    }
}

/// Every route that requires an API key
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Feed
        .route("/posts", get(handlers::get_feed).post(handlers::create_post))
        // Posts
        .route(
            "/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/:id/like", patch(handlers::toggle_like))
        .route(
            "/posts/:id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        // older web clients post to the singular path
        .route("/posts/:id/comment", post(handlers::add_comment))
        .route(
            "/posts/:id/comments/:comment_id",
            delete(handlers::delete_comment),
        )
        // Users
        .route("/users/search", get(handlers::search_users))
        .route(
            "/users/:id",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route("/users/:id/posts", get(handlers::get_user_posts))
        // Friends
        .route("/users/:id/friends", get(handlers::list_friends))
        .route(
            "/users/:id/friend-request",
            post(handlers::send_friend_request),
        )
        .route("/users/:id/friend", delete(handlers::remove_friend))
        .route(
            "/users/friend-requests/all",
            get(handlers::list_friend_requests),
        )
        .route(
            "/users/friend-requests/:id/accept",
            patch(handlers::accept_friend_request),
        )
        .route(
            "/users/friend-requests/:id/reject",
            patch(handlers::reject_friend_request),
        )
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/read-all", patch(handlers::mark_all_read))
        .route("/notifications/:id/read", patch(handlers::mark_read))
        .route("/notifications/unread/count", get(handlers::unread_count))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
}

/// Only the configured web client may call cross-origin; any origin when unset
fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = match &config.client_url {
        Some(url) => AllowOrigin::exact(
            url.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CLIENT_URL: {}", url))?,
        ),
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
