//! # graph-core
//!
//! Domain layer containing edges, value objects, read models, the Edge Store
//! port, and the collaborator ports for content and channels.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelProfile, ChannelStats, ContentReactionSummary, Edge, EdgeCursor, EdgeFilter, EdgeKey,
    EdgePage, OwnedContent, ReactionEdge, ReactionSummary, ReactionToggleResult,
    SubscriptionEdge, SubscriptionToggle, SubscriptionToggleResult,
};
pub use error::DomainError;
pub use traits::{
    ChannelDirectory, ContentCatalog, ContentRegistry, EdgeSnapshot, EdgeStore, EdgeTransaction,
    RepoResult,
};
pub use value_objects::{
    ActorId, ContentId, IdParseError, ReactionKind, ReactionState, ReactionToggle, Target,
    TargetType,
};
