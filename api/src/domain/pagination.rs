//! Keyset pagination for post feeds
//!
//! Pages are ordered by the composite key `(created_at, id)`. The id breaks
//! ties between posts sharing a timestamp, which keeps the order total and
//! lets a page boundary fall between two such posts without skipping or
//! repeating either.
//!
//! Continuation is an opaque [`FeedCursor`] naming the last post of the
//! previous page together with the context (filter/author and sort) it was
//! issued under. A cursor presented under a different context is rejected
//! instead of being reinterpreted in the new order.

use std::cmp::Ordering;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{PostId, UserId};

/// Page size used when the client sends none or an unusable one
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Upper bound on a single page
pub const MAX_PAGE_SIZE: usize = 50;

const CURSOR_VERSION: &str = "v1";

/// Audience restriction for the home feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Friends,
}

impl std::fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedFilter::All => write!(f, "all"),
            FeedFilter::Friends => write!(f, "friends"),
        }
    }
}

impl std::str::FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FeedFilter::All),
            "friends" => Ok(FeedFilter::Friends),
            _ => Err(format!("Unknown filter: {}. Use: all, friends", s)),
        }
    }
}

/// Direction over `(created_at, id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Newest first (descending)
    #[default]
    Latest,
    /// Oldest first (ascending)
    Oldest,
}

impl std::fmt::Display for FeedSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSort::Latest => write!(f, "latest"),
            FeedSort::Oldest => write!(f, "oldest"),
        }
    }
}

impl std::str::FromStr for FeedSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(FeedSort::Latest),
            "oldest" => Ok(FeedSort::Oldest),
            _ => Err(format!("Unknown sort: {}. Use: latest, oldest", s)),
        }
    }
}

/// Position of a post in feed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeedKey {
    // field order matters: derived Ord compares created_at first, then id
    pub created_at: DateTime<Utc>,
    pub id: PostId,
}

impl FeedKey {
    pub fn new(created_at: DateTime<Utc>, id: PostId) -> Self {
        Self { created_at, id }
    }

    /// Compare two keys in the order a page under `sort` lists them
    pub fn cmp_in(&self, other: &Self, sort: FeedSort) -> Ordering {
        match sort {
            FeedSort::Latest => other.cmp(self),
            FeedSort::Oldest => self.cmp(other),
        }
    }

    /// Whether `self` comes strictly after `cursor` under `sort`
    pub fn is_after(&self, cursor: &Self, sort: FeedSort) -> bool {
        self.cmp_in(cursor, sort) == Ordering::Greater
    }
}

/// Which posts a paged listing ranges over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// The home feed under an audience filter
    Feed(FeedFilter),
    /// A single author's timeline
    Author(UserId),
}

/// Everything a cursor's position depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorContext {
    pub scope: FeedScope,
    pub sort: FeedSort,
}

impl CursorContext {
    pub fn feed(filter: FeedFilter, sort: FeedSort) -> Self {
        Self {
            scope: FeedScope::Feed(filter),
            sort,
        }
    }

    pub fn author(author: UserId, sort: FeedSort) -> Self {
        Self {
            scope: FeedScope::Author(author),
            sort,
        }
    }
}

impl std::fmt::Display for CursorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            FeedScope::Feed(filter) => write!(f, "{}:{}", filter, self.sort),
            FeedScope::Author(author) => write!(f, "author:{}:{}", author, self.sort),
        }
    }
}

impl std::str::FromStr for CursorContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["author", id, sort] => {
                let id: i32 = id
                    .parse()
                    .map_err(|_| format!("Invalid author in cursor context: {}", id))?;
                Ok(CursorContext::author(UserId(id), sort.parse()?))
            }
            [filter, sort] => Ok(CursorContext::feed(filter.parse()?, sort.parse()?)),
            _ => Err(format!("Invalid cursor context: {}", s)),
        }
    }
}

/// Cursor decoding and validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Malformed cursor: {0}")]
    Malformed(String),

    #[error("Cursor issued for '{issued}' cannot continue '{requested}'; restart without it")]
    Mismatch { issued: String, requested: String },
}

/// Opaque continuation token
///
/// Encoded as URL-safe base64 of `v1|<context>|<post id>`. A bare positive
/// integer is also accepted as a legacy cursor; it carries no context and is
/// trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub post_id: PostId,
    pub context: Option<CursorContext>,
}

impl FeedCursor {
    pub fn new(post_id: PostId, context: CursorContext) -> Self {
        Self {
            post_id,
            context: Some(context),
        }
    }

    pub fn encode(&self) -> String {
        match self.context {
            Some(context) => URL_SAFE_NO_PAD.encode(format!(
                "{}|{}|{}",
                CURSOR_VERSION, context, self.post_id
            )),
            None => self.post_id.to_string(),
        }
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CursorError::Malformed("empty cursor".to_string()));
        }

        if token.bytes().all(|b| b.is_ascii_digit()) {
            let id: i32 = token
                .parse()
                .map_err(|_| CursorError::Malformed(format!("id out of range: {}", token)))?;
            if id <= 0 {
                return Err(CursorError::Malformed(format!("invalid id: {}", token)));
            }
            return Ok(Self {
                post_id: PostId(id),
                context: None,
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorError::Malformed("not a valid cursor token".to_string()))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| CursorError::Malformed("not a valid cursor token".to_string()))?;

        let mut parts = raw.splitn(3, '|');
        let (Some(version), Some(context), Some(id)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CursorError::Malformed("truncated cursor token".to_string()));
        };

        if version != CURSOR_VERSION {
            return Err(CursorError::Malformed(format!(
                "unsupported cursor version: {}",
                version
            )));
        }

        let context: CursorContext = context.parse().map_err(CursorError::Malformed)?;
        let id: i32 = id
            .parse()
            .map_err(|_| CursorError::Malformed(format!("invalid id: {}", id)))?;

        Ok(Self::new(PostId(id), context))
    }

    /// Fail when the cursor was issued under a different context
    pub fn ensure_context(&self, requested: CursorContext) -> Result<(), CursorError> {
        match self.context {
            Some(issued) if issued != requested => Err(CursorError::Mismatch {
                issued: issued.to_string(),
                requested: requested.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Resolve the `limit` query parameter
///
/// Missing, unparseable and non-positive values fall back to `default`;
/// oversized values are clamped to `max`. Never an error.
pub fn resolve_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    let max = max.max(1);
    match raw.map(str::trim).and_then(|v| v.parse::<i64>().ok()) {
        Some(n) if n > 0 => (n as u64).min(max as u64) as usize,
        _ => default.clamp(1, max),
    }
}

/// Continuation metadata returned with every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl PageInfo {
    /// `has_more` is derived from, and only from, the presence of a cursor
    pub fn from_next_cursor(next_cursor: Option<String>) -> Self {
        Self {
            has_more: next_cursor.is_some(),
            next_cursor,
        }
    }

    pub fn last() -> Self {
        Self::from_next_cursor(None)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub posts: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            pagination: PageInfo::last(),
        }
    }
}

/// Trim a `limit + 1` window down to a page
///
/// `rows` must already be in page order. When the storage returned the
/// lookahead row it is dropped and the cursor points at the new last row.
pub fn paginate<T>(
    mut rows: Vec<T>,
    limit: usize,
    context: CursorContext,
    id_of: impl Fn(&T) -> PostId,
) -> Page<T> {
    let next_cursor = if rows.len() > limit {
        rows.truncate(limit);
        rows.last()
            .map(|last| FeedCursor::new(id_of(last), context).encode())
    } else {
        None
    };

    Page {
        posts: rows,
        pagination: PageInfo::from_next_cursor(next_cursor),
    }
}
