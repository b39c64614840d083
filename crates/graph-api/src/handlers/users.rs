//! Current-user handlers

use axum::{
    extract::{Path, State},
    Json,
};
use graph_service::dto::{PaginatedResponse, ReactedTargetResponse, SubscriptionResponse};
use graph_service::ListingService;

use crate::extractors::{AuthUser, KindPath, Pagination, TargetTypeFilter};
use crate::response::ApiResult;
use crate::state::AppState;

/// List channels the caller subscribes to
///
/// GET /users/@me/subscriptions
pub async fn get_my_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<SubscriptionResponse>>> {
    let service = ListingService::new(state.service_context());
    let listing = service
        .list_subscriptions(auth.actor_id, pagination.page)
        .await?;
    Ok(Json(listing.into_response()))
}

/// List targets the caller liked or disliked
///
/// GET /users/@me/reactions/{kind}?type=video
pub async fn get_my_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<KindPath>,
    TargetTypeFilter(target_type): TargetTypeFilter,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<ReactedTargetResponse>>> {
    let kind = path.kind()?;

    let service = ListingService::new(state.service_context());
    let listing = service
        .list_reacted_targets(auth.actor_id, kind, target_type, pagination.page)
        .await?;
    Ok(Json(listing.into_response()))
}
