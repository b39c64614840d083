//! Newest-first listings of the edges around a channel, an actor, or a target

use graph_core::entities::{Edge, EdgeCursor, EdgeFilter, EdgePage, ReactionEdge, SubscriptionEdge};
use graph_core::value_objects::{ActorId, ReactionKind, Target, TargetType};
use graph_core::DomainError;
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeListing<T> {
    pub items: Vec<T>,
    /// Limit the page was fetched with
    pub limit: u32,
    /// Resume point when more items follow
    pub next: Option<EdgeCursor>,
}

impl<T> EdgeListing<T> {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Listing service
pub struct ListingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ListingService<'a> {
    /// Create a new ListingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Who subscribes to a channel
    #[instrument(skip(self))]
    pub async fn list_subscribers(
        &self,
        channel: ActorId,
        page: EdgePage,
    ) -> ServiceResult<EdgeListing<SubscriptionEdge>> {
        self.require_channel(&channel).await?;
        self.fetch(EdgeFilter::SubscribersOf(channel), page, Edge::into_subscription)
            .await
    }

    /// Which channels a known channel subscribes to
    #[instrument(skip(self))]
    pub async fn list_channel_subscriptions(
        &self,
        channel: ActorId,
        page: EdgePage,
    ) -> ServiceResult<EdgeListing<SubscriptionEdge>> {
        self.require_channel(&channel).await?;
        self.list_subscriptions(channel, page).await
    }

    /// Which channels a user subscribes to
    #[instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        subscriber: ActorId,
        page: EdgePage,
    ) -> ServiceResult<EdgeListing<SubscriptionEdge>> {
        self.fetch(
            EdgeFilter::SubscriptionsOf(subscriber),
            page,
            Edge::into_subscription,
        )
        .await
    }

    /// Who liked, or disliked, a target
    #[instrument(skip(self))]
    pub async fn list_reactors(
        &self,
        target: Target,
        kind: ReactionKind,
        page: EdgePage,
    ) -> ServiceResult<EdgeListing<ReactionEdge>> {
        if self.ctx.content().owner_of(&target).await?.is_none() {
            return Err(DomainError::InvalidTarget(target).into());
        }

        self.fetch(
            EdgeFilter::ReactionsOn { target, kind },
            page,
            Edge::into_reaction,
        )
        .await
    }

    /// What an actor liked, or disliked, optionally narrowed to one target type
    #[instrument(skip(self))]
    pub async fn list_reacted_targets(
        &self,
        actor: ActorId,
        kind: ReactionKind,
        target_type: Option<TargetType>,
        page: EdgePage,
    ) -> ServiceResult<EdgeListing<ReactionEdge>> {
        self.fetch(
            EdgeFilter::ReactionsBy {
                actor,
                target_type,
                kind,
            },
            page,
            Edge::into_reaction,
        )
        .await
    }

    async fn require_channel(&self, channel: &ActorId) -> ServiceResult<()> {
        if self.ctx.channels().channel_exists(channel).await? {
            Ok(())
        } else {
            Err(DomainError::ChannelNotFound(channel.clone()).into())
        }
    }

    /// Fetch one extra edge to learn whether another page exists
    async fn fetch<T>(
        &self,
        filter: EdgeFilter,
        page: EdgePage,
        narrow: fn(Edge) -> Option<T>,
    ) -> ServiceResult<EdgeListing<T>> {
        if let Some(cursor) = &page.after {
            if !filter.accepts(cursor) {
                return Err(DomainError::ValidationError(format!(
                    "Invalid cursor for this listing: {}",
                    cursor.encode()
                ))
                .into());
            }
        }

        let limit = page.limit;
        let lookahead = EdgePage {
            limit: limit + 1,
            after: page.after,
        };
        let mut edges = self.ctx.edge_store().list_edges(&filter, lookahead).await?;

        let next = if edges.len() > limit as usize {
            edges.truncate(limit as usize);
            edges.last().map(|edge| EdgeCursor::after_edge(&filter, edge))
        } else {
            None
        };

        Ok(EdgeListing {
            items: edges.into_iter().filter_map(narrow).collect(),
            limit,
            next,
        })
    }
}
