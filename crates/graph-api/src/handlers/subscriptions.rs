//! Subscription handlers

use axum::{
    extract::{Path, State},
    Json,
};
use graph_service::dto::{ApiResponse, SubscriptionToggleResponse};
use graph_service::ToggleService;

use crate::extractors::{AuthUser, ChannelIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Subscribe to a channel, or unsubscribe if already subscribed
///
/// POST /subscriptions/{channel_id}
pub async fn toggle_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<ApiResponse<SubscriptionToggleResponse>>> {
    let channel_id = path.channel_id()?;

    let service = ToggleService::new(state.service_context());
    let result = service
        .toggle_subscription(auth.actor_id, channel_id)
        .await?;
    Ok(Json(ApiResponse::new(result.into())))
}
