//! Path parameter extractors
//!
//! Typed parsing of actor ids, content targets, and reaction kinds from path
//! segments.

use graph_core::{ActorId, ReactionKind, Target, TargetType};
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with channel_id
#[derive(Debug, Deserialize)]
pub struct ChannelIdPath {
    pub channel_id: String,
}

impl ChannelIdPath {
    /// Parse channel_id as an ActorId
    pub fn channel_id(&self) -> Result<ActorId, ApiError> {
        parse_id(&self.channel_id, "channel_id")
    }
}

/// Path parameters naming a content item
#[derive(Debug, Deserialize)]
pub struct TargetPath {
    pub target_type: String,
    pub target_id: String,
}

impl TargetPath {
    /// Parse into a Target; unknown types are a domain validation error
    pub fn target(&self) -> Result<Target, ApiError> {
        let target_type: TargetType = self.target_type.parse()?;
        Ok(Target::new(target_type, parse_id(&self.target_id, "target_id")?))
    }
}

/// Path parameters naming a content item and a reaction kind
#[derive(Debug, Deserialize)]
pub struct TargetKindPath {
    pub target_type: String,
    pub target_id: String,
    pub kind: String,
}

impl TargetKindPath {
    pub fn target(&self) -> Result<Target, ApiError> {
        TargetPath {
            target_type: self.target_type.clone(),
            target_id: self.target_id.clone(),
        }
        .target()
    }

    pub fn kind(&self) -> Result<ReactionKind, ApiError> {
        Ok(self.kind.parse()?)
    }
}

/// Path parameter with a reaction kind
#[derive(Debug, Deserialize)]
pub struct KindPath {
    pub kind: String,
}

impl KindPath {
    pub fn kind(&self) -> Result<ReactionKind, ApiError> {
        Ok(self.kind.parse()?)
    }
}
