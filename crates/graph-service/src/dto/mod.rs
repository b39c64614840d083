//! Data transfer objects for API responses
//!
//! This module provides:
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain view models and edges to DTOs

pub mod mappers;
pub mod responses;

pub use responses::{
    ApiResponse, ChannelProfileResponse, ChannelStatsResponse, ContentReactionResponse,
    HealthChecks, HealthResponse, PaginatedResponse, PaginationMeta, ReactedTargetResponse,
    ReactionSummaryResponse, ReactionToggleResponse, ReactorResponse, ReadinessResponse,
    SubscriberResponse, SubscriptionResponse, SubscriptionToggleResponse, TargetResponse,
};
