//! Friend service
//!
//! Friend requests and the friend set. Each pair of users has at most one
//! friendship row, whose status walks:
//!
//! ```text
//! (none) --send--> pending --accept--> accepted --remove--> (none)
//!                  pending --reject--> rejected --send--> pending
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    FriendPair, FriendRequestView, FriendRequests, Friendship, FriendshipId, FriendshipStatus,
    NewNotification, NotificationKind, User, UserId, UserSummary,
};
use crate::domain::ports::{FriendshipRepository, NotificationRepository, UserRepository};
use crate::error::{AppError, DomainError};

/// Every user connected to `user` by an accepted friendship
pub(crate) async fn friend_ids<FR>(
    friendships: &FR,
    user: &UserId,
) -> Result<Vec<UserId>, DomainError>
where
    FR: FriendshipRepository + ?Sized,
{
    let edges = friendships
        .find_for_user(user, FriendshipStatus::Accepted)
        .await?;

    let mut ids: Vec<UserId> = edges
        .iter()
        .filter_map(|edge| edge.pair.other(*user))
        .collect();
    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// Service for friend requests and friend lists
pub struct FriendService<FR, UR, NR>
where
    FR: FriendshipRepository,
    UR: UserRepository,
    NR: NotificationRepository,
{
    friendships: Arc<FR>,
    users: Arc<UR>,
    notifications: Arc<NR>,
}

impl<FR, UR, NR> FriendService<FR, UR, NR>
where
    FR: FriendshipRepository,
    UR: UserRepository,
    NR: NotificationRepository,
{
    pub fn new(friendships: Arc<FR>, users: Arc<UR>, notifications: Arc<NR>) -> Self {
        Self {
            friendships,
            users,
            notifications,
        }
    }

    /// Send a friend request from `viewer` to `target`
    ///
    /// If `target` already has a pending request out to `viewer`, this
    /// accepts it instead of opening a second one.
    pub async fn send_request(
        &self,
        viewer: &User,
        target: &UserId,
    ) -> Result<Friendship, AppError> {
        let pair = FriendPair::new(viewer.id, *target).ok_or_else(|| {
            AppError::BadRequest("You cannot send a friend request to yourself".to_string())
        })?;

        if self.users.find_by_id(target).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", target)));
        }

        let friendship = match self.friendships.find_by_pair(&pair).await? {
            None => self.friendships.create_request(&pair, &viewer.id).await?,
            Some(existing) => match existing.status {
                FriendshipStatus::Accepted => {
                    return Err(AppError::Conflict("You are already friends".to_string()));
                }
                FriendshipStatus::Pending if existing.requester_id == viewer.id => {
                    return Err(AppError::Conflict(
                        "Friend request already sent".to_string(),
                    ));
                }
                FriendshipStatus::Pending => {
                    tracing::info!(
                        friendship_id = %existing.id,
                        user = %viewer.id,
                        "Crossed friend requests, accepting"
                    );
                    return self.accept_pending(viewer, existing).await;
                }
                FriendshipStatus::Rejected => {
                    self.friendships
                        .set_status(&existing.id, FriendshipStatus::Pending, &viewer.id)
                        .await?
                }
            },
        };

        self.notify(
            *target,
            viewer,
            NotificationKind::FriendRequest,
            format!("{} sent you a friend request", viewer.name),
        )
        .await;

        Ok(friendship)
    }

    /// Accept a pending request addressed to `viewer`
    pub async fn accept(&self, viewer: &User, id: &FriendshipId) -> Result<Friendship, AppError> {
        let friendship = self.pending_for(viewer, id).await?;
        self.accept_pending(viewer, friendship).await
    }

    /// Reject a pending request addressed to `viewer`
    pub async fn reject(&self, viewer: &User, id: &FriendshipId) -> Result<Friendship, AppError> {
        let friendship = self.pending_for(viewer, id).await?;
        Ok(self
            .friendships
            .set_status(&friendship.id, FriendshipStatus::Rejected, &friendship.requester_id)
            .await?)
    }

    /// Remove an accepted friendship between `viewer` and `friend`
    pub async fn remove(&self, viewer: &User, friend: &UserId) -> Result<(), AppError> {
        let pair = FriendPair::new(viewer.id, *friend)
            .ok_or_else(|| AppError::BadRequest("You cannot unfriend yourself".to_string()))?;

        match self.friendships.find_by_pair(&pair).await? {
            Some(edge) if edge.is_accepted() => {
                self.friendships.delete(&edge.id).await?;
                Ok(())
            }
            _ => Err(AppError::NotFound("Friendship not found".to_string())),
        }
    }

    /// Friends of any user, as summaries sorted by name
    pub async fn list_friends(&self, user: &UserId) -> Result<Vec<UserSummary>, AppError> {
        if self.users.find_by_id(user).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user)));
        }

        let ids = friend_ids(self.friendships.as_ref(), user).await?;
        let mut friends: Vec<UserSummary> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(User::summary)
            .collect();
        friends.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(friends)
    }

    /// Pending requests touching `viewer`, split into received and sent
    pub async fn list_requests(&self, viewer: &User) -> Result<FriendRequests, AppError> {
        let mut pending = self
            .friendships
            .find_for_user(&viewer.id, FriendshipStatus::Pending)
            .await?;
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let others: Vec<UserId> = pending
            .iter()
            .filter_map(|edge| edge.pair.other(viewer.id))
            .collect();
        let summaries: HashMap<UserId, UserSummary> = self
            .users
            .find_by_ids(&others)
            .await?
            .iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        let summary_of = |id: UserId| {
            summaries.get(&id).cloned().unwrap_or_else(|| UserSummary {
                id,
                name: "Deleted user".to_string(),
                avatar: None,
            })
        };

        let mut requests = FriendRequests::default();
        for edge in pending {
            let view = FriendRequestView {
                id: edge.id,
                status: edge.status,
                created_at: edge.created_at,
                sender: if edge.requester_id == viewer.id {
                    viewer.summary()
                } else {
                    summary_of(edge.requester_id)
                },
                receiver: if edge.addressee() == viewer.id {
                    viewer.summary()
                } else {
                    summary_of(edge.addressee())
                },
            };
            if edge.requester_id == viewer.id {
                requests.sent.push(view);
            } else {
                requests.received.push(view);
            }
        }

        Ok(requests)
    }

    async fn pending_for(&self, viewer: &User, id: &FriendshipId) -> Result<Friendship, AppError> {
        let friendship = self
            .friendships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

        if !friendship.pair.contains(viewer.id) || friendship.requester_id == viewer.id {
            return Err(AppError::Forbidden(
                "Only the recipient can answer a friend request".to_string(),
            ));
        }

        if !friendship.can_respond(viewer.id) {
            return Err(AppError::Conflict(format!(
                "Friend request is already {}",
                friendship.status
            )));
        }

        Ok(friendship)
    }

    async fn accept_pending(
        &self,
        viewer: &User,
        friendship: Friendship,
    ) -> Result<Friendship, AppError> {
        let accepted = self
            .friendships
            .set_status(&friendship.id, FriendshipStatus::Accepted, &friendship.requester_id)
            .await?;

        self.notify(
            friendship.requester_id,
            viewer,
            NotificationKind::FriendAccepted,
            format!("{} accepted your friend request", viewer.name),
        )
        .await;

        Ok(accepted)
    }

    async fn notify(
        &self,
        recipient: UserId,
        actor: &User,
        kind: NotificationKind,
        message: String,
    ) {
        let notification = NewNotification {
            user_id: recipient,
            actor_id: actor.id,
            kind,
            post_id: None,
            message,
        };
        // the friendship change already happened; a lost notification is not fatal
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::warn!(
                error = %e,
                recipient = %recipient,
                kind = %kind,
                "Failed to create notification"
            );
        }
    }
}
