//! Edge entities - subscriptions and reactions, their natural keys, and the
//! partial keys used to count and page through them

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::DomainError;
use crate::value_objects::{ActorId, ContentId, ReactionKind, Target, TargetType};

/// Default page size for edge listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page size a listing will honor
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Edge timestamps are stored with microsecond precision (PostgreSQL
/// `TIMESTAMPTZ`), so they are truncated at creation to compare equal after a
/// round trip.
fn edge_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// ============================================================================
// Edges
// ============================================================================

/// Subscriber follows a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEdge {
    pub subscriber: ActorId,
    pub channel: ActorId,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionEdge {
    /// Create a new subscription edge stamped with the current time
    pub fn new(subscriber: ActorId, channel: ActorId) -> Self {
        Self {
            subscriber,
            channel,
            created_at: edge_timestamp(),
        }
    }

    /// Natural key of this edge
    pub fn key(&self) -> EdgeKey {
        EdgeKey::Subscription {
            subscriber: self.subscriber.clone(),
            channel: self.channel.clone(),
        }
    }

    /// Check if the subscriber is the channel itself
    #[inline]
    pub fn is_self_subscription(&self) -> bool {
        self.subscriber == self.channel
    }
}

/// Actor likes or dislikes a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEdge {
    pub actor: ActorId,
    pub target: Target,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl ReactionEdge {
    /// Create a new reaction edge stamped with the current time
    pub fn new(actor: ActorId, target: Target, kind: ReactionKind) -> Self {
        Self {
            actor,
            target,
            kind,
            created_at: edge_timestamp(),
        }
    }

    /// Natural key of this edge (kind is not part of it)
    pub fn key(&self) -> EdgeKey {
        EdgeKey::Reaction {
            actor: self.actor.clone(),
            target: self.target.clone(),
        }
    }

    #[inline]
    pub fn is_kind(&self, kind: ReactionKind) -> bool {
        self.kind == kind
    }
}

/// Either edge class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    Subscription(SubscriptionEdge),
    Reaction(ReactionEdge),
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        match self {
            Self::Subscription(edge) => edge.key(),
            Self::Reaction(edge) => edge.key(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Subscription(edge) => edge.created_at,
            Self::Reaction(edge) => edge.created_at,
        }
    }

    pub fn as_subscription(&self) -> Option<&SubscriptionEdge> {
        match self {
            Self::Subscription(edge) => Some(edge),
            Self::Reaction(_) => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&ReactionEdge> {
        match self {
            Self::Reaction(edge) => Some(edge),
            Self::Subscription(_) => None,
        }
    }

    pub fn into_subscription(self) -> Option<SubscriptionEdge> {
        match self {
            Self::Subscription(edge) => Some(edge),
            Self::Reaction(_) => None,
        }
    }

    pub fn into_reaction(self) -> Option<ReactionEdge> {
        match self {
            Self::Reaction(edge) => Some(edge),
            Self::Subscription(_) => None,
        }
    }
}

impl From<SubscriptionEdge> for Edge {
    fn from(edge: SubscriptionEdge) -> Self {
        Self::Subscription(edge)
    }
}

impl From<ReactionEdge> for Edge {
    fn from(edge: ReactionEdge) -> Self {
        Self::Reaction(edge)
    }
}

// ============================================================================
// Keys and Filters
// ============================================================================

/// Natural key of an edge; at most one stored edge per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Subscription { subscriber: ActorId, channel: ActorId },
    Reaction { actor: ActorId, target: Target },
}

impl EdgeKey {
    pub fn subscription(subscriber: ActorId, channel: ActorId) -> Self {
        Self::Subscription { subscriber, channel }
    }

    pub fn reaction(actor: ActorId, target: Target) -> Self {
        Self::Reaction { actor, target }
    }
}

/// Partial key selecting a set of edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeFilter {
    /// Subscriptions pointing at a channel
    SubscribersOf(ActorId),
    /// Subscriptions held by a subscriber
    SubscriptionsOf(ActorId),
    /// Reactions of one kind on a single target
    ReactionsOn { target: Target, kind: ReactionKind },
    /// Reactions of one kind on any of several targets
    ReactionsOnAny { targets: Vec<Target>, kind: ReactionKind },
    /// Reactions of one kind made by an actor, optionally of one target type
    ReactionsBy {
        actor: ActorId,
        target_type: Option<TargetType>,
        kind: ReactionKind,
    },
}

impl EdgeFilter {
    /// Check if an edge is selected by this filter
    pub fn matches(&self, edge: &Edge) -> bool {
        match (self, edge) {
            (Self::SubscribersOf(channel), Edge::Subscription(e)) => e.channel == *channel,
            (Self::SubscriptionsOf(subscriber), Edge::Subscription(e)) => {
                e.subscriber == *subscriber
            }
            (Self::ReactionsOn { target, kind }, Edge::Reaction(e)) => {
                e.target == *target && e.kind == *kind
            }
            (Self::ReactionsOnAny { targets, kind }, Edge::Reaction(e)) => {
                e.kind == *kind && targets.contains(&e.target)
            }
            (
                Self::ReactionsBy {
                    actor,
                    target_type,
                    kind,
                },
                Edge::Reaction(e),
            ) => {
                e.actor == *actor
                    && e.kind == *kind
                    && target_type.map_or(true, |t| e.target.target_type == t)
            }
            _ => false,
        }
    }

    /// Endpoint on the far side of the edge from the filter's fixed one.
    ///
    /// For reactions listed by actor the far side is a target, and ids are
    /// only unique within a target type, so the type comes along.
    pub fn counterpart<'e>(&self, edge: &'e Edge) -> (Option<TargetType>, &'e str) {
        match (self, edge) {
            (Self::SubscribersOf(_), Edge::Subscription(e)) => (None, e.subscriber.as_str()),
            (Self::SubscriptionsOf(_), Edge::Subscription(e)) => (None, e.channel.as_str()),
            (Self::ReactionsOn { .. } | Self::ReactionsOnAny { .. }, Edge::Reaction(e)) => {
                (None, e.actor.as_str())
            }
            (Self::ReactionsBy { .. }, Edge::Reaction(e)) => {
                (Some(e.target.target_type), e.target.id.as_str())
            }
            (_, Edge::Subscription(e)) => (None, e.subscriber.as_str()),
            (_, Edge::Reaction(e)) => (None, e.actor.as_str()),
        }
    }

    /// Listings order by this key descending
    pub fn sort_key<'e>(&self, edge: &'e Edge) -> EdgeSortKey<'e> {
        let (target_type, id) = self.counterpart(edge);
        (edge.created_at(), type_key(target_type), id)
    }

    /// Check if a cursor was taken from a listing shaped like this one
    pub fn accepts(&self, cursor: &EdgeCursor) -> bool {
        matches!(self, Self::ReactionsBy { .. }) == cursor.target_type.is_some()
    }

    /// Check if this filter selects subscription edges
    pub fn is_subscription(&self) -> bool {
        matches!(self, Self::SubscribersOf(_) | Self::SubscriptionsOf(_))
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// `(created_at, target type, counterpart id)`, compared bytewise. Edges
/// whose counterpart is not a target use the empty string for the type.
pub type EdgeSortKey<'a> = (DateTime<Utc>, &'static str, &'a str);

fn type_key(target_type: Option<TargetType>) -> &'static str {
    target_type.map_or("", |t| t.as_str())
}

/// Keyset position in a newest-first edge listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeCursor {
    pub created_at: DateTime<Utc>,
    /// Set only in listings of reactions by actor
    pub target_type: Option<TargetType>,
    pub tiebreak: String,
}

impl EdgeCursor {
    pub fn new(
        created_at: DateTime<Utc>,
        target_type: Option<TargetType>,
        tiebreak: impl Into<String>,
    ) -> Self {
        Self {
            created_at,
            target_type,
            tiebreak: tiebreak.into(),
        }
    }

    /// Cursor pointing just past `edge` in a listing of `filter`
    pub fn after_edge(filter: &EdgeFilter, edge: &Edge) -> Self {
        let (target_type, tiebreak) = filter.counterpart(edge);
        Self::new(edge.created_at(), target_type, tiebreak)
    }

    /// Encode as `<created_at-micros>:<tiebreak>`, or
    /// `<created_at-micros>:<target type>:<tiebreak>` when typed
    pub fn encode(&self) -> String {
        let micros = self.created_at.timestamp_micros();
        match self.target_type {
            Some(t) => format!("{micros}:{t}:{}", self.tiebreak),
            None => format!("{micros}:{}", self.tiebreak),
        }
    }

    /// Decode a cursor produced by [`EdgeCursor::encode`]
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::ValidationError(format!("Invalid cursor: {raw}"));

        let mut parts = raw.splitn(3, ':');
        let micros: i64 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        let created_at = DateTime::from_timestamp_micros(micros).ok_or_else(invalid)?;

        let (target_type, tiebreak) = match (parts.next(), parts.next()) {
            (Some(id), None) => (None, ActorId::parse(id).map_err(|_| invalid())?.into_inner()),
            (Some(t), Some(id)) => {
                let target_type = t.parse::<TargetType>().map_err(|_| invalid())?;
                let id = ContentId::parse(id).map_err(|_| invalid())?;
                (Some(target_type), id.into_inner())
            }
            _ => return Err(invalid()),
        };

        Ok(Self::new(created_at, target_type, tiebreak))
    }

    pub fn sort_key(&self) -> EdgeSortKey<'_> {
        (self.created_at, type_key(self.target_type), &self.tiebreak)
    }

    /// Check if an edge with this sort key comes strictly after the cursor
    pub fn precedes(&self, key: EdgeSortKey<'_>) -> bool {
        key < self.sort_key()
    }
}

/// Page request for edge listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePage {
    pub limit: u32,
    pub after: Option<EdgeCursor>,
}

impl EdgePage {
    /// First page with the given limit, clamped to `1..=MAX_PAGE_LIMIT`
    pub fn first(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            after: None,
        }
    }

    /// Continue after a cursor
    pub fn after(mut self, cursor: EdgeCursor) -> Self {
        self.after = Some(cursor);
        self
    }
}

impl Default for EdgePage {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_LIMIT)
    }
}
