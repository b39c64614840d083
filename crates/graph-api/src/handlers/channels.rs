//! Channel handlers
//!
//! Profile, statistics, audience, and outgoing subscriptions of a channel.

use axum::{
    extract::{Path, State},
    Json,
};
use graph_service::dto::{
    ApiResponse, ChannelProfileResponse, ChannelStatsResponse, ContentReactionResponse,
    PaginatedResponse, SubscriberResponse, SubscriptionResponse,
};
use graph_service::{AggregationService, ListingService};

use crate::extractors::{AuthUser, ChannelIdPath, OptionalAuthUser, Pagination};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get a channel profile as seen by the caller, if any
///
/// GET /channels/{channel_id}/profile
pub async fn get_channel_profile(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<ApiResponse<ChannelProfileResponse>>> {
    let channel_id = path.channel_id()?;

    let service = AggregationService::new(state.service_context());
    let profile = service
        .get_channel_profile(channel_id, viewer.actor_id())
        .await?;
    Ok(Json(ApiResponse::new(profile.into())))
}

/// Get channel dashboard totals
///
/// GET /channels/{channel_id}/stats
pub async fn get_channel_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<ApiResponse<ChannelStatsResponse>>> {
    let channel_id = path.channel_id()?;

    let service = AggregationService::new(state.service_context());
    let stats = service.get_channel_stats(channel_id).await?;
    Ok(Json(ApiResponse::new(stats.into())))
}

/// Get per-video reaction counts for a channel
///
/// GET /channels/{channel_id}/content
pub async fn get_channel_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<ApiResponse<Vec<ContentReactionResponse>>>> {
    let channel_id = path.channel_id()?;

    let service = AggregationService::new(state.service_context());
    let rows = service.list_channel_content_reactions(channel_id).await?;
    Ok(Json(ApiResponse::new(
        rows.into_iter().map(ContentReactionResponse::from).collect(),
    )))
}

/// List a channel's subscribers, newest first
///
/// GET /channels/{channel_id}/subscribers
pub async fn get_channel_subscribers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<SubscriberResponse>>> {
    let channel_id = path.channel_id()?;

    let service = ListingService::new(state.service_context());
    let listing = service
        .list_subscribers(channel_id, pagination.page)
        .await?;
    Ok(Json(listing.into_response()))
}

/// List the channels a channel subscribes to, newest first
///
/// GET /channels/{channel_id}/subscriptions
pub async fn get_channel_subscriptions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<SubscriptionResponse>>> {
    let channel_id = path.channel_id()?;

    let service = ListingService::new(state.service_context());
    let listing = service
        .list_channel_subscriptions(channel_id, pagination.page)
        .await?;
    Ok(Json(listing.into_response()))
}
