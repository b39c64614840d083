//! Database models - SQLx-compatible structs for PostgreSQL tables

mod content;
mod edge;

pub use content::OwnedContentModel;
pub use edge::{ReactionEdgeModel, SubscriptionEdgeModel};
