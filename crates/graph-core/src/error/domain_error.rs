//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ActorId, Target};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(ActorId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Target does not exist: {0}")]
    InvalidTarget(Target),

    #[error("Unknown target type: {0}")]
    InvalidTargetType(String),

    #[error("Unknown reaction kind: {0}")]
    InvalidReactionKind(String),

    #[error("Cannot subscribe to your own channel")]
    SelfSubscription,

    #[error("Cannot react to your own content")]
    SelfReaction,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Concurrent modification of the same edge")]
    EdgeConflict,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::InvalidTargetType(_) => "INVALID_TARGET_TYPE",
            Self::InvalidReactionKind(_) => "INVALID_REACTION_KIND",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::SelfReaction => "SELF_REACTION",

            // Conflict
            Self::EdgeConflict => "EDGE_CONFLICT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidTarget(_)
                | Self::InvalidTargetType(_)
                | Self::InvalidReactionKind(_)
                | Self::SelfSubscription
                | Self::SelfReaction
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EdgeConflict)
    }
}
