//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Actor and content IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response with cursor-based pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, after: Option<String>, limit: u32) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                has_more: after.is_some(),
                after,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for fetching the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Whether more results exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: u32,
}

/// Content item reference, e.g. `{"type": "video", "id": "42"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetResponse {
    #[serde(rename = "type")]
    pub target_type: &'static str,
    pub id: String,
}

// ============================================================================
// Toggle Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionToggleResponse {
    pub subscriber_id: String,
    pub channel_id: String,
    /// `subscribed` or `unsubscribed`
    pub state: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub target: TargetResponse,
    /// `set`, `switched` or `none`
    pub state: &'static str,
    /// The caller's reaction after the toggle: `like`, `dislike` or `none`
    pub reaction: &'static str,
}

// ============================================================================
// Aggregate Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChannelProfileResponse {
    pub channel_id: String,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed_by_viewer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummaryResponse {
    pub target: TargetResponse,
    pub like_count: i64,
    pub dislike_count: i64,
    pub viewer_reaction: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatsResponse {
    pub channel_id: String,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentReactionResponse {
    pub target: TargetResponse,
    pub views: i64,
    pub like_count: i64,
    pub dislike_count: i64,
}

// ============================================================================
// Listing Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SubscriberResponse {
    pub subscriber_id: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub channel_id: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactorResponse {
    pub actor_id: String,
    pub kind: &'static str,
    pub reacted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactedTargetResponse {
    pub target: TargetResponse,
    pub kind: &'static str,
    pub reacted_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub edge_store: String,
}

impl ReadinessResponse {
    pub fn ready(edge_store_healthy: bool) -> Self {
        Self {
            status: if edge_store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                edge_store: if edge_store_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
