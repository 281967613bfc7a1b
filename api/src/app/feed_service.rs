//! Feed service
//!
//! The feed pager: returns one page of posts for a viewer, continuing from
//! an opaque cursor. Every post listing in the API (home feed, profile
//! timeline) resolves its cursor first, then fetches one keyset window.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{FeedPost, Post, User, UserId, UserSummary};
use crate::domain::pagination::{
    paginate, CursorContext, FeedCursor, FeedFilter, FeedKey, FeedSort, Page,
};
use crate::domain::ports::{
    EngagementRepository, FeedWindow, FriendshipRepository, PostRepository, UserRepository,
};
use crate::error::AppError;

use super::friend_service::friend_ids;

/// A resolved request for one page of the home feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub limit: usize,
    pub cursor: Option<String>,
    pub filter: FeedFilter,
    pub sort: FeedSort,
}

/// Service for paging through posts
pub struct FeedService<PR, ER, FR, UR>
where
    PR: PostRepository,
    ER: EngagementRepository,
    FR: FriendshipRepository,
    UR: UserRepository,
{
    posts: Arc<PR>,
    engagements: Arc<ER>,
    friendships: Arc<FR>,
    users: Arc<UR>,
}

impl<PR, ER, FR, UR> FeedService<PR, ER, FR, UR>
where
    PR: PostRepository,
    ER: EngagementRepository,
    FR: FriendshipRepository,
    UR: UserRepository,
{
    pub fn new(posts: Arc<PR>, engagements: Arc<ER>, friendships: Arc<FR>, users: Arc<UR>) -> Self {
        Self {
            posts,
            engagements,
            friendships,
            users,
        }
    }

    /// One page of the home feed
    pub async fn get_feed(
        &self,
        viewer: &User,
        query: FeedQuery,
    ) -> Result<Page<FeedPost>, AppError> {
        let context = CursorContext::feed(query.filter, query.sort);
        // a bad cursor fails even when the page would be empty
        let after = self.resolve_cursor(query.cursor.as_deref(), context).await?;

        let authors = match query.filter {
            FeedFilter::All => None,
            FeedFilter::Friends => {
                let friends = friend_ids(self.friendships.as_ref(), &viewer.id).await?;
                if friends.is_empty() {
                    tracing::debug!(viewer = %viewer.id, "Friends feed requested with no friends");
                    return Ok(Page::empty());
                }
                Some(friends)
            }
        };

        self.page(viewer, authors, context, query.limit, after).await
    }

    /// One page of a single author's posts
    pub async fn get_author_timeline(
        &self,
        viewer: &User,
        author: &UserId,
        limit: usize,
        cursor: Option<&str>,
        sort: FeedSort,
    ) -> Result<Page<FeedPost>, AppError> {
        if self.users.find_by_id(author).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", author)));
        }

        let context = CursorContext::author(*author, sort);
        let after = self.resolve_cursor(cursor, context).await?;
        self.page(viewer, Some(vec![*author]), context, limit, after)
            .await
    }

    /// Decode a cursor issued under `context` into the key of its post
    async fn resolve_cursor(
        &self,
        cursor: Option<&str>,
        context: CursorContext,
    ) -> Result<Option<FeedKey>, AppError> {
        let Some(token) = cursor else {
            return Ok(None);
        };

        let cursor = FeedCursor::decode(token)?;
        cursor.ensure_context(context)?;
        let post = self
            .posts
            .find_by_id(&cursor.post_id)
            .await?
            .ok_or(AppError::CursorNotFound(cursor.post_id))?;
        Ok(Some(FeedKey::new(post.created_at, post.id)))
    }

    /// Fetch `limit + 1` rows after `after`, trim the lookahead, annotate
    async fn page(
        &self,
        viewer: &User,
        authors: Option<Vec<UserId>>,
        context: CursorContext,
        limit: usize,
        after: Option<FeedKey>,
    ) -> Result<Page<FeedPost>, AppError> {
        let limit = limit.max(1);

        let window = FeedWindow {
            authors,
            after,
            sort: context.sort,
            fetch: limit + 1,
        };
        let rows = self.posts.find_feed_window(&window).await?;

        let page = paginate(rows, limit, context, |post| post.id);

        tracing::debug!(
            viewer = %viewer.id,
            context = %context,
            returned = page.posts.len(),
            has_more = page.pagination.has_more,
            "Served feed page"
        );

        let posts = annotate_posts(
            self.users.as_ref(),
            self.engagements.as_ref(),
            &viewer.id,
            page.posts,
        )
        .await?;

        Ok(Page {
            posts,
            pagination: page.pagination,
        })
    }
}

/// Attach author summaries, counts and the viewer's like flag
///
/// Authors and stats are loaded in one batch each for the whole set.
pub(crate) async fn annotate_posts<UR, ER>(
    users: &UR,
    engagements: &ER,
    viewer: &UserId,
    posts: Vec<Post>,
) -> Result<Vec<FeedPost>, AppError>
where
    UR: UserRepository + ?Sized,
    ER: EngagementRepository + ?Sized,
{
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let mut author_ids: Vec<UserId> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<UserId, UserSummary> = users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.summary()))
        .collect();

    let post_ids: Vec<_> = posts.iter().map(|p| p.id).collect();
    let stats = engagements.stats_for_posts(&post_ids, viewer).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let author = authors
                .get(&post.author_id)
                .cloned()
                .unwrap_or_else(|| UserSummary {
                    id: post.author_id,
                    name: "Deleted user".to_string(),
                    avatar: None,
                });
            let stats = stats.get(&post.id).copied().unwrap_or_default();
            FeedPost::new(post, author, stats)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Duration;

    use super::*;
    use crate::domain::entities::PostId;
    use crate::domain::pagination::PageInfo;
    use crate::test_utils::{
        base_time, test_post_at, test_user, InMemoryEngagementRepository,
        InMemoryFriendshipRepository, InMemoryPostRepository, InMemoryUserRepository,
    };

    type TestFeedService = FeedService<
        InMemoryPostRepository,
        InMemoryEngagementRepository,
        InMemoryFriendshipRepository,
        InMemoryUserRepository,
    >;

    fn create_service(
        posts: InMemoryPostRepository,
        engagements: InMemoryEngagementRepository,
        friendships: InMemoryFriendshipRepository,
        users: InMemoryUserRepository,
    ) -> TestFeedService {
        FeedService::new(
            Arc::new(posts),
            Arc::new(engagements),
            Arc::new(friendships),
            Arc::new(users),
        )
    }

    fn query(
        limit: usize,
        cursor: Option<String>,
        filter: FeedFilter,
        sort: FeedSort,
    ) -> FeedQuery {
        FeedQuery {
            limit,
            cursor,
            filter,
            sort,
        }
    }

    /// Ten posts by one author, one second apart, ids 1..=10
    fn ten_posts() -> (User, InMemoryPostRepository) {
        let author = test_user(1, "Ada");
        let mut repo = InMemoryPostRepository::new();
        for i in 1..=10 {
            let at = base_time() + Duration::seconds(i as i64);
            repo = repo.with_post(test_post_at(i, author.id, at));
        }
        (author, repo)
    }

    async fn collect_all(
        service: &TestFeedService,
        viewer: &User,
        limit: usize,
        filter: FeedFilter,
        sort: FeedSort,
    ) -> Vec<PostId> {
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = service
                .get_feed(viewer, query(limit, cursor.clone(), filter, sort))
                .await
                .unwrap();
            assert!(page.posts.len() <= limit);
            seen.extend(page.posts.iter().map(|p| p.id));
            match page.pagination.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        seen
    }

    #[tokio::test]
    async fn latest_first_two_pages_of_five() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let first = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();

        let ids: Vec<i32> = first.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6]);
        assert!(first.pagination.has_more);

        let token = first.pagination.next_cursor.clone().unwrap();
        assert_eq!(FeedCursor::decode(&token).unwrap().post_id, PostId(6));

        let second = service
            .get_feed(&author, query(5, Some(token), FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();

        let ids: Vec<i32> = second.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert_eq!(second.pagination, PageInfo::last());
    }

    #[tokio::test]
    async fn oldest_first_is_ascending_and_complete() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let all = collect_all(&service, &author, 3, FeedFilter::All, FeedSort::Oldest).await;

        let expected: Vec<PostId> = (1..=10).map(PostId).collect();
        assert_eq!(all, expected);
    }

    #[tokio::test]
    async fn exact_multiple_of_limit_ends_without_cursor() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let page = service
            .get_feed(&author, query(10, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();

        assert_eq!(page.posts.len(), 10);
        assert!(!page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_none());
    }

    #[tokio::test]
    async fn shared_timestamps_never_skip_or_repeat() {
        let author = test_user(1, "Ada");
        let same = base_time();
        let mut posts = InMemoryPostRepository::new();
        // ids 1..=7 where 2..=6 share one timestamp
        posts = posts.with_post(test_post_at(1, author.id, same - Duration::seconds(1)));
        for id in 2..=6 {
            posts = posts.with_post(test_post_at(id, author.id, same));
        }
        posts = posts.with_post(test_post_at(7, author.id, same + Duration::seconds(1)));

        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        for limit in 1..=4 {
            let latest =
                collect_all(&service, &author, limit, FeedFilter::All, FeedSort::Latest).await;
            let ids: Vec<i32> = latest.iter().map(|p| p.0).collect();
            assert_eq!(ids, vec![7, 6, 5, 4, 3, 2, 1], "latest, limit {}", limit);

            let oldest =
                collect_all(&service, &author, limit, FeedFilter::All, FeedSort::Oldest).await;
            let ids: Vec<i32> = oldest.iter().map(|p| p.0).collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7], "oldest, limit {}", limit);
        }
    }

    #[tokio::test]
    async fn timestamp_order_wins_over_id_order() {
        let author = test_user(1, "Ada");
        // id 1 is newer than id 2
        let posts = InMemoryPostRepository::new()
            .with_post(test_post_at(1, author.id, base_time() + Duration::seconds(10)))
            .with_post(test_post_at(2, author.id, base_time()));

        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let page = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();

        let ids: Vec<i32> = page.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn friends_filter_with_no_friends_is_empty() {
        let (author, posts) = ten_posts();
        let viewer = test_user(2, "Bo");
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new()
                .with_user(author)
                .with_user(viewer.clone()),
        );

        let page = service
            .get_feed(&viewer, query(5, None, FeedFilter::Friends, FeedSort::Latest))
            .await
            .unwrap();

        assert!(page.posts.is_empty());
        assert!(!page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_none());
    }

    #[tokio::test]
    async fn friends_filter_with_no_friends_still_checks_cursor() {
        let (author, posts) = ten_posts();
        let viewer = test_user(2, "Bo");
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new()
                .with_user(author)
                .with_user(viewer.clone()),
        );

        let garbage = service
            .get_feed(
                &viewer,
                query(5, Some("%%%".to_string()), FeedFilter::Friends, FeedSort::Latest),
            )
            .await;
        assert!(matches!(garbage, Err(AppError::InvalidCursor(_))));

        let missing = service
            .get_feed(
                &viewer,
                query(5, Some("999".to_string()), FeedFilter::Friends, FeedSort::Latest),
            )
            .await;
        assert!(matches!(missing, Err(AppError::CursorNotFound(PostId(999)))));

        let foreign = FeedCursor::new(
            PostId(3),
            CursorContext::feed(FeedFilter::All, FeedSort::Latest),
        )
        .encode();
        let mismatched = service
            .get_feed(
                &viewer,
                query(5, Some(foreign), FeedFilter::Friends, FeedSort::Latest),
            )
            .await;
        assert!(matches!(mismatched, Err(AppError::InvalidCursor(_))));

        // a cursor naming a live post still yields the empty page
        let page = service
            .get_feed(
                &viewer,
                query(5, Some("3".to_string()), FeedFilter::Friends, FeedSort::Latest),
            )
            .await
            .unwrap();
        assert!(page.posts.is_empty());
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn friends_filter_uses_both_directions() {
        let viewer = test_user(1, "Ada");
        let low_friend = test_user(2, "Bo");
        let high_friend = test_user(3, "Cy");
        let stranger = test_user(4, "Di");

        let mut posts = InMemoryPostRepository::new();
        let mut id = 0;
        for author in [&viewer, &low_friend, &high_friend, &stranger] {
            for _ in 0..3 {
                id += 1;
                posts = posts.with_post(test_post_at(
                    id,
                    author.id,
                    base_time() + Duration::seconds(id as i64),
                ));
            }
        }

        // viewer requested Bo, Cy requested viewer
        let friendships = InMemoryFriendshipRepository::new()
            .with_friends(viewer.id, low_friend.id)
            .with_friends(high_friend.id, viewer.id)
            .with_pending(stranger.id, viewer.id);

        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            friendships,
            InMemoryUserRepository::new()
                .with_user(viewer.clone())
                .with_user(low_friend.clone())
                .with_user(high_friend.clone())
                .with_user(stranger),
        );

        let ids = collect_all(&service, &viewer, 2, FeedFilter::Friends, FeedSort::Latest).await;

        let expected: Vec<PostId> = (4..=9).rev().map(PostId).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn pages_are_duplicate_free_and_exhaustive() {
        let users: Vec<User> = (1..=3).map(|i| test_user(i, &format!("user-{}", i))).collect();
        let mut posts = InMemoryPostRepository::new();
        // 25 posts spread over authors with clustered timestamps
        for id in 1..=25 {
            let author = users[(id as usize) % users.len()].id;
            let at = base_time() + Duration::seconds((id / 4) as i64);
            posts = posts.with_post(test_post_at(id, author, at));
        }

        let mut user_repo = InMemoryUserRepository::new();
        for user in &users {
            user_repo = user_repo.with_user(user.clone());
        }

        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            user_repo,
        );

        for sort in [FeedSort::Latest, FeedSort::Oldest] {
            for limit in [1, 4, 5, 7, 25, 30] {
                let ids = collect_all(&service, &users[0], limit, FeedFilter::All, sort).await;
                let unique: HashSet<PostId> = ids.iter().copied().collect();
                assert_eq!(unique.len(), ids.len(), "duplicates at limit {}", limit);
                assert_eq!(ids.len(), 25, "missing posts at limit {}", limit);
            }
        }
    }

    #[tokio::test]
    async fn page_is_strictly_ordered() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        for sort in [FeedSort::Latest, FeedSort::Oldest] {
            let page = service
                .get_feed(&author, query(10, None, FeedFilter::All, sort))
                .await
                .unwrap();
            for pair in page.posts.windows(2) {
                let a = FeedKey::new(pair[0].created_at, pair[0].id);
                let b = FeedKey::new(pair[1].created_at, pair[1].id);
                assert!(b.is_after(&a, sort));
            }
        }
    }

    #[tokio::test]
    async fn deleted_cursor_row_is_reported() {
        let (author, posts) = ten_posts();
        let posts = Arc::new(posts);
        let service = FeedService::new(
            posts.clone(),
            Arc::new(InMemoryEngagementRepository::new()),
            Arc::new(InMemoryFriendshipRepository::new()),
            Arc::new(InMemoryUserRepository::new().with_user(author.clone())),
        );

        let first = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();
        let token = first.pagination.next_cursor.unwrap();

        posts.delete(&PostId(6)).await.unwrap();

        let result = service
            .get_feed(&author, query(5, Some(token), FeedFilter::All, FeedSort::Latest))
            .await;

        assert!(matches!(result, Err(AppError::CursorNotFound(PostId(6)))));
    }

    #[tokio::test]
    async fn deleting_earlier_post_does_not_shift_next_page() {
        let (author, posts) = ten_posts();
        let posts = Arc::new(posts);
        let service = FeedService::new(
            posts.clone(),
            Arc::new(InMemoryEngagementRepository::new()),
            Arc::new(InMemoryFriendshipRepository::new()),
            Arc::new(InMemoryUserRepository::new().with_user(author.clone())),
        );

        let first = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();
        posts.delete(&PostId(9)).await.unwrap();

        let second = service
            .get_feed(
                &author,
                query(5, first.pagination.next_cursor, FeedFilter::All, FeedSort::Latest),
            )
            .await
            .unwrap();

        let ids: Vec<i32> = second.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn cursor_from_other_sort_is_rejected() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let first = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await
            .unwrap();

        let result = service
            .get_feed(
                &author,
                query(5, first.pagination.next_cursor, FeedFilter::All, FeedSort::Oldest),
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCursor(_))));
    }

    #[tokio::test]
    async fn legacy_integer_cursor_continues_after_row() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let page = service
            .get_feed(
                &author,
                query(3, Some("4".to_string()), FeedFilter::All, FeedSort::Oldest),
            )
            .await
            .unwrap();

        let ids: Vec<i32> = page.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert!(page.pagination.has_more);
    }

    #[tokio::test]
    async fn garbage_cursor_is_rejected() {
        let (author, posts) = ten_posts();
        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let result = service
            .get_feed(
                &author,
                query(5, Some("%%%".to_string()), FeedFilter::All, FeedSort::Latest),
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCursor(_))));
    }

    #[tokio::test]
    async fn posts_are_annotated_for_viewer() {
        let author = test_user(1, "Ada");
        let viewer = test_user(2, "Bo");
        let posts = InMemoryPostRepository::new()
            .with_post(test_post_at(1, author.id, base_time()))
            .with_post(test_post_at(2, author.id, base_time() + Duration::seconds(1)));

        let engagements = InMemoryEngagementRepository::new()
            .with_like(PostId(1), viewer.id)
            .with_like(PostId(1), author.id)
            .with_like(PostId(2), author.id)
            .with_comment(PostId(2), viewer.id, "nice");

        let service = create_service(
            posts,
            engagements,
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new()
                .with_user(author.clone())
                .with_user(viewer.clone()),
        );

        let page = service
            .get_feed(&viewer, query(5, None, FeedFilter::All, FeedSort::Oldest))
            .await
            .unwrap();

        assert_eq!(page.posts[0].likes_count, 2);
        assert!(page.posts[0].is_liked);
        assert_eq!(page.posts[0].comments_count, 0);
        assert_eq!(page.posts[0].author.name, "Ada");

        assert_eq!(page.posts[1].likes_count, 1);
        assert!(!page.posts[1].is_liked);
        assert_eq!(page.posts[1].comments_count, 1);
    }

    #[tokio::test]
    async fn storage_failure_yields_no_page() {
        let author = test_user(1, "Ada");
        let service = create_service(
            InMemoryPostRepository::unavailable(),
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(author.clone()),
        );

        let result = service
            .get_feed(&author, query(5, None, FeedFilter::All, FeedSort::Latest))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(crate::error::DomainError::Database(_)))
        ));
    }

    #[tokio::test]
    async fn author_timeline_pages_only_that_author() {
        let ada = test_user(1, "Ada");
        let bo = test_user(2, "Bo");
        let mut posts = InMemoryPostRepository::new();
        for id in 1..=6 {
            let author = if id % 2 == 0 { bo.id } else { ada.id };
            let at = base_time() + Duration::seconds(id as i64);
            posts = posts.with_post(test_post_at(id, author, at));
        }

        let service = create_service(
            posts,
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(ada.clone()).with_user(bo.clone()),
        );

        let first = service
            .get_author_timeline(&ada, &bo.id, 2, None, FeedSort::Latest)
            .await
            .unwrap();
        let ids: Vec<i32> = first.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![6, 4]);

        let token = first.pagination.next_cursor.unwrap();
        let second = service
            .get_author_timeline(&ada, &bo.id, 2, Some(&token), FeedSort::Latest)
            .await
            .unwrap();
        let ids: Vec<i32> = second.posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![2]);
        assert!(!second.pagination.has_more);

        // a timeline cursor is not valid for the home feed
        let result = service
            .get_feed(&ada, query(2, Some(token), FeedFilter::All, FeedSort::Latest))
            .await;
        assert!(matches!(result, Err(AppError::InvalidCursor(_))));
    }

    #[tokio::test]
    async fn author_timeline_unknown_user() {
        let ada = test_user(1, "Ada");
        let service = create_service(
            InMemoryPostRepository::new(),
            InMemoryEngagementRepository::new(),
            InMemoryFriendshipRepository::new(),
            InMemoryUserRepository::new().with_user(ada.clone()),
        );

        let result = service
            .get_author_timeline(&ada, &UserId(99), 5, None, FeedSort::Latest)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
