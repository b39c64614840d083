//! Domain entities - edges and the read models derived from them

mod edge;
mod view_models;

pub use edge::{
    Edge, EdgeCursor, EdgeFilter, EdgeKey, EdgePage, EdgeSortKey, ReactionEdge, SubscriptionEdge,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use view_models::{
    ChannelProfile, ChannelStats, ContentReactionSummary, OwnedContent, ReactionSummary,
    ReactionToggleResult, SubscriptionToggle, SubscriptionToggleResult,
};
