//! Feed handlers
//!
//! Cursor-paged post listings: the home feed and a user's timeline.
//! Query parameters are lenient about `limit` (bad values fall back to the
//! default) but strict about `filter` and `sort`.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::FeedQuery;
use crate::config::Config;
use crate::domain::entities::{FeedPost, User, UserId};
use crate::domain::pagination::{resolve_limit, FeedSort, Page};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for GET /posts
///
/// Everything is taken as a raw string so that an unusable `limit` is
/// defaulted instead of rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl FeedParams {
    pub fn into_query(self, config: &Config) -> Result<FeedQuery, AppError> {
        Ok(FeedQuery {
            limit: resolve_limit(
                self.limit.as_deref(),
                config.default_page_size,
                config.max_page_size,
            ),
            cursor: non_empty(self.cursor),
            filter: parse_choice(self.filter.as_deref())?,
            sort: parse_choice(self.sort.as_deref())?,
        })
    }
}

/// Query parameters for GET /users/:id/posts
#[derive(Debug, Default, Deserialize)]
pub struct TimelineParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an enum-valued parameter; absent or blank means the default
fn parse_choice<T>(raw: Option<&str>) -> Result<T, AppError>
where
    T: FromStr<Err = String> + Default,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.parse().map_err(AppError::BadRequest),
        None => Ok(T::default()),
    }
}

/// GET /posts
///
/// One page of the home feed for the authenticated user.
pub async fn get_feed(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Page<FeedPost>>, AppError> {
    let query = params.into_query(&state.config)?;
    let page = state.feed_service.get_feed(&user, query).await?;
    Ok(Json(page))
}

/// GET /users/:id/posts
///
/// One page of a single user's posts.
pub async fn get_user_posts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(author_id): Path<i32>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<Page<FeedPost>>, AppError> {
    let limit = resolve_limit(
        params.limit.as_deref(),
        state.config.default_page_size,
        state.config.max_page_size,
    );
    let sort: FeedSort = parse_choice(params.sort.as_deref())?;
    let cursor = non_empty(params.cursor);

    let page = state
        .feed_service
        .get_author_timeline(&user, &UserId(author_id), limit, cursor.as_deref(), sort)
        .await?;
    Ok(Json(page))
}
