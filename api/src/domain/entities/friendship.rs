//! Friendship domain entity
//!
//! A friendship is an undirected edge between two users. It is stored once
//! per pair, keyed by the canonical `(low, high)` ordering of the two user
//! ids, so lookups by either endpoint hit the same row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserId, UserSummary};

/// Unique identifier for a friendship row (doubles as the request id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FriendshipId(pub i32);

impl std::fmt::Display for FriendshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered pair of distinct users in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FriendPair {
    low: UserId,
    high: UserId,
}

impl FriendPair {
    /// Build the canonical pair. Returns `None` for a self-pair.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }

    /// The endpoint opposite `user`, or `None` if `user` is not on this edge
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// Lifecycle of a friendship row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendshipStatus::Pending => write!(f, "pending"),
            FriendshipStatus::Accepted => write!(f, "accepted"),
            FriendshipStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for FriendshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            "rejected" => Ok(FriendshipStatus::Rejected),
            _ => Err(format!("Unknown friendship status: {}", s)),
        }
    }
}

/// A stored friendship edge
#[derive(Debug, Clone)]
pub struct Friendship {
    pub id: FriendshipId,
    pub pair: FriendPair,
    /// Who sent the (most recent) request
    pub requester_id: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// The user the request was sent to
    pub fn addressee(&self) -> UserId {
        // requester is always one of the endpoints
        self.pair.other(self.requester_id).unwrap_or(self.pair.low())
    }

    /// Only the addressee may answer a pending request
    pub fn can_respond(&self, user: UserId) -> bool {
        self.status == FriendshipStatus::Pending && self.addressee() == user
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }
}

/// A pending request as shown to one of its endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestView {
    pub id: FriendshipId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub sender: UserSummary,
    pub receiver: UserSummary,
}

/// Pending requests split by direction
#[derive(Debug, Clone, Default, Serialize)]
pub struct FriendRequests {
    pub received: Vec<FriendRequestView>,
    pub sent: Vec<FriendRequestView>,
}
