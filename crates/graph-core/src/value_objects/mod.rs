//! Value objects - immutable types that represent domain concepts

mod ids;
mod reaction_kind;
mod target;

pub use ids::{ActorId, ContentId, IdParseError, MAX_ID_LEN};
pub use reaction_kind::{ReactionKind, ReactionState, ReactionToggle};
pub use target::{Target, TargetType};
