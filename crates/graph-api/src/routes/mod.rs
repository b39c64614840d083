//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{channels, health, reactions, subscriptions, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, served at the root
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(subscription_routes())
        .merge(channel_routes())
        .merge(reaction_routes())
        .merge(user_routes())
}

/// Subscription routes
fn subscription_routes() -> Router<AppState> {
    Router::new().route(
        "/subscriptions/:channel_id",
        post(subscriptions::toggle_subscription),
    )
}

/// Channel routes
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/channels/:channel_id/profile", get(channels::get_channel_profile))
        .route("/channels/:channel_id/stats", get(channels::get_channel_stats))
        .route("/channels/:channel_id/content", get(channels::get_channel_content))
        .route(
            "/channels/:channel_id/subscribers",
            get(channels::get_channel_subscribers),
        )
        .route(
            "/channels/:channel_id/subscriptions",
            get(channels::get_channel_subscriptions),
        )
}

/// Reaction routes
fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reactions/:target_type/:target_id",
            get(reactions::get_reaction_summary),
        )
        .route(
            "/reactions/:target_type/:target_id/:kind",
            post(reactions::toggle_reaction),
        )
        .route(
            "/reactions/:target_type/:target_id/:kind/actors",
            get(reactions::get_reactors),
        )
}

/// Current-user routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me/subscriptions", get(users::get_my_subscriptions))
        .route("/users/@me/reactions/:kind", get(users::get_my_reactions))
}
