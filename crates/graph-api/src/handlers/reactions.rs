//! Reaction handlers
//!
//! Endpoints for likes and dislikes on videos, comments, and tweets.

use axum::{
    extract::{Path, State},
    Json,
};
use graph_service::dto::{
    ApiResponse, PaginatedResponse, ReactionSummaryResponse, ReactionToggleResponse,
    ReactorResponse,
};
use graph_service::{AggregationService, ListingService, ToggleService};

use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, TargetKindPath, TargetPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle the caller's reaction on a target
///
/// POST /reactions/{target_type}/{target_id}/{kind}
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<TargetKindPath>,
) -> ApiResult<Json<ApiResponse<ReactionToggleResponse>>> {
    let target = path.target()?;
    let kind = path.kind()?;

    let service = ToggleService::new(state.service_context());
    let result = service.toggle_reaction(auth.actor_id, target, kind).await?;
    Ok(Json(ApiResponse::new(result.into())))
}

/// Get like/dislike counts for a target
///
/// GET /reactions/{target_type}/{target_id}
pub async fn get_reaction_summary(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<TargetPath>,
) -> ApiResult<Json<ApiResponse<ReactionSummaryResponse>>> {
    let target = path.target()?;

    let service = AggregationService::new(state.service_context());
    let summary = service
        .get_reaction_summary(target, viewer.actor_id())
        .await?;
    Ok(Json(ApiResponse::new(summary.into())))
}

/// List actors who reacted with a kind, newest first
///
/// GET /reactions/{target_type}/{target_id}/{kind}/actors
pub async fn get_reactors(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<TargetKindPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<ReactorResponse>>> {
    let target = path.target()?;
    let kind = path.kind()?;

    let service = ListingService::new(state.service_context());
    let listing = service
        .list_reactors(target, kind, pagination.page)
        .await?;
    Ok(Json(listing.into_response()))
}
