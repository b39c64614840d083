//! Edge entity <-> model mappers
//!
//! Every column is constrained by the schema, so a failure here means the
//! row was written outside this service.

use graph_core::entities::{OwnedContent, ReactionEdge, SubscriptionEdge};
use graph_core::error::DomainError;
use graph_core::value_objects::{ActorId, ContentId, Target};

use crate::models::{OwnedContentModel, ReactionEdgeModel, SubscriptionEdgeModel};

fn corrupt(table: &str, column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("unexpected {table}.{column}: {value}"))
}

fn actor_column(table: &str, column: &str, value: &str) -> Result<ActorId, DomainError> {
    ActorId::parse(value).map_err(|_| corrupt(table, column, value))
}

/// Convert SubscriptionEdgeModel to SubscriptionEdge entity
impl TryFrom<SubscriptionEdgeModel> for SubscriptionEdge {
    type Error = DomainError;

    fn try_from(model: SubscriptionEdgeModel) -> Result<Self, Self::Error> {
        const TABLE: &str = "subscription_edges";

        Ok(SubscriptionEdge {
            subscriber: actor_column(TABLE, "subscriber_id", &model.subscriber_id)?,
            channel: actor_column(TABLE, "channel_id", &model.channel_id)?,
            created_at: model.created_at,
        })
    }
}

/// Convert ReactionEdgeModel to ReactionEdge entity
impl TryFrom<ReactionEdgeModel> for ReactionEdge {
    type Error = DomainError;

    fn try_from(model: ReactionEdgeModel) -> Result<Self, Self::Error> {
        const TABLE: &str = "reaction_edges";

        let target_type = model
            .target_type
            .parse()
            .map_err(|_| corrupt(TABLE, "target_type", &model.target_type))?;
        let target_id = ContentId::parse(&model.target_id)
            .map_err(|_| corrupt(TABLE, "target_id", &model.target_id))?;
        let kind = model
            .kind
            .parse()
            .map_err(|_| corrupt(TABLE, "kind", &model.kind))?;

        Ok(ReactionEdge {
            actor: actor_column(TABLE, "actor_id", &model.actor_id)?,
            target: Target::new(target_type, target_id),
            kind,
            created_at: model.created_at,
        })
    }
}

/// Content ids come from the content service's own tables
impl TryFrom<OwnedContentModel> for OwnedContent {
    type Error = DomainError;

    fn try_from(model: OwnedContentModel) -> Result<Self, Self::Error> {
        let id = ContentId::parse(&model.id).map_err(|_| corrupt("content", "id", &model.id))?;
        Ok(OwnedContent::new(id, model.views))
    }
}
