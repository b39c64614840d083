//! Reaction targets - a content item addressed by (type, id)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::ContentId;
use crate::error::DomainError;

/// Kind of content an actor can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Video,
    Comment,
    Tweet,
}

impl TargetType {
    /// Every target type, in storage order
    pub const ALL: [TargetType; 3] = [Self::Video, Self::Comment, Self::Tweet];

    /// Wire and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
            Self::Tweet => "tweet",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" | "videos" => Ok(Self::Video),
            "comment" | "comments" => Ok(Self::Comment),
            "tweet" | "tweets" => Ok(Self::Tweet),
            _ => Err(DomainError::InvalidTargetType(s.to_string())),
        }
    }
}

/// A content item an actor reacts to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    pub id: ContentId,
}

impl Target {
    pub fn new(target_type: TargetType, id: ContentId) -> Self {
        Self { target_type, id }
    }

    pub fn video(id: impl Into<ContentId>) -> Self {
        Self::new(TargetType::Video, id.into())
    }

    pub fn comment(id: impl Into<ContentId>) -> Self {
        Self::new(TargetType::Comment, id.into())
    }

    pub fn tweet(id: impl Into<ContentId>) -> Self {
        Self::new(TargetType::Tweet, id.into())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target_type, self.id)
    }
}
