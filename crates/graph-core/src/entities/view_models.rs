//! Read models assembled per request from edge counts and lookups.
//! Never persisted.

use crate::value_objects::{ActorId, ContentId, ReactionState, ReactionToggle, Target};

/// Subscription counts for a channel, relative to a viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProfile {
    pub channel: ActorId,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    /// Always false for anonymous viewers
    pub is_subscribed_by_viewer: bool,
}

/// Like/dislike counts on a target, relative to a viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummary {
    pub target: Target,
    pub like_count: i64,
    pub dislike_count: i64,
    pub viewer_reaction: ReactionState,
}

/// Dashboard totals for a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStats {
    pub channel: ActorId,
    pub total_views: i64,
    pub total_subscribers: i64,
    /// Likes on the channel's videos; dislikes are not counted
    pub total_likes: i64,
}

/// Per-video row of a channel's content dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentReactionSummary {
    pub target: Target,
    pub views: i64,
    pub like_count: i64,
    pub dislike_count: i64,
}

/// State of a subscription after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionToggle {
    Subscribed,
    Unsubscribed,
}

impl SubscriptionToggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
        }
    }

    #[inline]
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed)
    }
}

/// Outcome of toggling a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionToggleResult {
    pub subscriber: ActorId,
    pub channel: ActorId,
    pub state: SubscriptionToggle,
}

/// Outcome of toggling a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionToggleResult {
    pub target: Target,
    pub state: ReactionToggle,
    /// The actor's reaction on the target after the toggle
    pub reaction: ReactionState,
}

/// A content item owned by a channel, as reported by the content service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedContent {
    pub id: ContentId,
    pub views: i64,
}

impl OwnedContent {
    pub fn new(id: impl Into<ContentId>, views: i64) -> Self {
        Self {
            id: id.into(),
            views,
        }
    }
}
