//! Edge database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the subscription_edges table
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionEdgeModel {
    pub subscriber_id: String,
    pub channel_id: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for the reaction_edges table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionEdgeModel {
    pub actor_id: String,
    pub target_type: String,
    pub target_id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
