//! Reaction kinds and the per-(actor, target) reaction state machine
//!
//! States: `none`, `liked`, `disliked`. The only input is a toggle with a
//! kind; the machine is memoryless.
//!
//! | from     | like             | dislike             |
//! |----------|------------------|---------------------|
//! | none     | liked (set)      | disliked (set)      |
//! | liked    | none (cleared)   | disliked (switched) |
//! | disliked | liked (switched) | none (cleared)      |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Kind of a reaction edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// The mutually exclusive kind
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// Wire and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" | "likes" => Ok(Self::Like),
            "dislike" | "dislikes" => Ok(Self::Dislike),
            _ => Err(DomainError::InvalidReactionKind(s.to_string())),
        }
    }
}

/// Current reaction of one actor on one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReactionState {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "like")]
    Liked,
    #[serde(rename = "dislike")]
    Disliked,
}

/// What a reaction toggle did to the edge set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionToggle {
    /// No prior reaction; a new edge was inserted
    #[serde(rename = "set")]
    Set,
    /// The opposite kind was replaced by the requested one
    #[serde(rename = "switched")]
    Switched,
    /// The same kind was toggled again and removed
    #[serde(rename = "none")]
    Cleared,
}

impl ReactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Liked => "like",
            Self::Disliked => "dislike",
        }
    }

    /// State after toggling `kind`, and the kind of change it represents
    pub fn apply(self, kind: ReactionKind) -> (ReactionState, ReactionToggle) {
        match self.kind() {
            None => (Self::from(kind), ReactionToggle::Set),
            Some(current) if current == kind => (Self::None, ReactionToggle::Cleared),
            Some(_) => (Self::from(kind), ReactionToggle::Switched),
        }
    }

    /// Kind of the edge backing this state, if any
    pub fn kind(self) -> Option<ReactionKind> {
        match self {
            Self::None => None,
            Self::Liked => Some(ReactionKind::Like),
            Self::Disliked => Some(ReactionKind::Dislike),
        }
    }
}

impl ReactionToggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Switched => "switched",
            Self::Cleared => "none",
        }
    }
}

impl From<ReactionKind> for ReactionState {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Self::Liked,
            ReactionKind::Dislike => Self::Disliked,
        }
    }
}

impl From<Option<ReactionKind>> for ReactionState {
    fn from(kind: Option<ReactionKind>) -> Self {
        kind.map_or(Self::None, Self::from)
    }
}
