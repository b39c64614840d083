//! Domain to DTO mappers
//!
//! Implements `From` conversions from view models and edges to response DTOs.

use graph_core::entities::{
    ChannelProfile, ChannelStats, ContentReactionSummary, ReactionEdge, ReactionSummary,
    ReactionToggleResult, SubscriptionEdge, SubscriptionToggleResult,
};
use graph_core::value_objects::Target;

use super::responses::{
    ChannelProfileResponse, ChannelStatsResponse, ContentReactionResponse, PaginatedResponse,
    ReactedTargetResponse, ReactionSummaryResponse, ReactionToggleResponse, ReactorResponse,
    SubscriberResponse, SubscriptionResponse, SubscriptionToggleResponse, TargetResponse,
};
use crate::services::EdgeListing;

impl From<Target> for TargetResponse {
    fn from(target: Target) -> Self {
        Self {
            target_type: target.target_type.as_str(),
            id: target.id.to_string(),
        }
    }
}

// ============================================================================
// Toggle Mappers
// ============================================================================

impl From<SubscriptionToggleResult> for SubscriptionToggleResponse {
    fn from(result: SubscriptionToggleResult) -> Self {
        Self {
            subscriber_id: result.subscriber.to_string(),
            channel_id: result.channel.to_string(),
            state: result.state.as_str(),
        }
    }
}

impl From<ReactionToggleResult> for ReactionToggleResponse {
    fn from(result: ReactionToggleResult) -> Self {
        Self {
            target: result.target.into(),
            state: result.state.as_str(),
            reaction: result.reaction.as_str(),
        }
    }
}

// ============================================================================
// Aggregate Mappers
// ============================================================================

impl From<&ChannelProfile> for ChannelProfileResponse {
    fn from(profile: &ChannelProfile) -> Self {
        Self {
            channel_id: profile.channel.to_string(),
            subscriber_count: profile.subscriber_count,
            subscribed_to_count: profile.subscribed_to_count,
            is_subscribed_by_viewer: profile.is_subscribed_by_viewer,
        }
    }
}

impl From<ChannelProfile> for ChannelProfileResponse {
    fn from(profile: ChannelProfile) -> Self {
        Self::from(&profile)
    }
}

impl From<ReactionSummary> for ReactionSummaryResponse {
    fn from(summary: ReactionSummary) -> Self {
        Self {
            target: summary.target.into(),
            like_count: summary.like_count,
            dislike_count: summary.dislike_count,
            viewer_reaction: summary.viewer_reaction.as_str(),
        }
    }
}

impl From<ChannelStats> for ChannelStatsResponse {
    fn from(stats: ChannelStats) -> Self {
        Self {
            channel_id: stats.channel.to_string(),
            total_views: stats.total_views,
            total_subscribers: stats.total_subscribers,
            total_likes: stats.total_likes,
        }
    }
}

impl From<ContentReactionSummary> for ContentReactionResponse {
    fn from(row: ContentReactionSummary) -> Self {
        Self {
            target: row.target.into(),
            views: row.views,
            like_count: row.like_count,
            dislike_count: row.dislike_count,
        }
    }
}

// ============================================================================
// Listing Mappers
// ============================================================================

impl From<&SubscriptionEdge> for SubscriberResponse {
    fn from(edge: &SubscriptionEdge) -> Self {
        Self {
            subscriber_id: edge.subscriber.to_string(),
            subscribed_at: edge.created_at,
        }
    }
}

impl From<&SubscriptionEdge> for SubscriptionResponse {
    fn from(edge: &SubscriptionEdge) -> Self {
        Self {
            channel_id: edge.channel.to_string(),
            subscribed_at: edge.created_at,
        }
    }
}

impl From<&ReactionEdge> for ReactorResponse {
    fn from(edge: &ReactionEdge) -> Self {
        Self {
            actor_id: edge.actor.to_string(),
            kind: edge.kind.as_str(),
            reacted_at: edge.created_at,
        }
    }
}

impl From<&ReactionEdge> for ReactedTargetResponse {
    fn from(edge: &ReactionEdge) -> Self {
        Self {
            target: edge.target.clone().into(),
            kind: edge.kind.as_str(),
            reacted_at: edge.created_at,
        }
    }
}

impl<T> EdgeListing<T> {
    /// Map items into a paginated response carrying the encoded next cursor
    pub fn into_response<R>(self) -> PaginatedResponse<R>
    where
        R: for<'a> From<&'a T>,
    {
        let data = self.items.iter().map(R::from).collect();
        PaginatedResponse::new(data, self.next.map(|cursor| cursor.encode()), self.limit)
    }
}
