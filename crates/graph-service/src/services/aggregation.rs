//! Aggregation engine
//!
//! Read-only queries that combine edge counts and lookups with a viewer into
//! view models. All edge reads of one query come from a single snapshot.

use graph_core::entities::{
    ChannelProfile, ChannelStats, ContentReactionSummary, EdgeFilter, EdgeKey, OwnedContent,
    ReactionSummary,
};
use graph_core::traits::EdgeSnapshot;
use graph_core::value_objects::{ActorId, ReactionKind, ReactionState, Target, TargetType};
use graph_core::DomainError;
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Aggregation service
pub struct AggregationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AggregationService<'a> {
    /// Create a new AggregationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Subscription counts of a channel and whether the viewer subscribes to it
    #[instrument(skip(self))]
    pub async fn get_channel_profile(
        &self,
        channel: ActorId,
        viewer: Option<ActorId>,
    ) -> ServiceResult<ChannelProfile> {
        self.require_channel(&channel).await?;

        let mut snapshot = self.ctx.edge_store().snapshot().await?;
        let subscriber_count = snapshot
            .count_edges(&EdgeFilter::SubscribersOf(channel.clone()))
            .await?;
        let subscribed_to_count = snapshot
            .count_edges(&EdgeFilter::SubscriptionsOf(channel.clone()))
            .await?;
        let is_subscribed_by_viewer = match viewer {
            Some(viewer) => snapshot
                .find_edge(&EdgeKey::subscription(viewer, channel.clone()))
                .await?
                .is_some(),
            None => false,
        };
        snapshot.close().await?;

        Ok(ChannelProfile {
            channel,
            subscriber_count,
            subscribed_to_count,
            is_subscribed_by_viewer,
        })
    }

    /// Like and dislike counts on a target and the viewer's own reaction
    #[instrument(skip(self))]
    pub async fn get_reaction_summary(
        &self,
        target: Target,
        viewer: Option<ActorId>,
    ) -> ServiceResult<ReactionSummary> {
        self.require_target(&target).await?;

        let mut snapshot = self.ctx.edge_store().snapshot().await?;
        let (like_count, dislike_count) = reaction_counts(snapshot.as_mut(), &target).await?;
        let viewer_reaction = match viewer {
            Some(viewer) => snapshot
                .find_edge(&EdgeKey::reaction(viewer, target.clone()))
                .await?
                .and_then(|edge| edge.as_reaction().map(|e| e.kind))
                .into(),
            None => ReactionState::None,
        };
        snapshot.close().await?;

        Ok(ReactionSummary {
            target,
            like_count,
            dislike_count,
            viewer_reaction,
        })
    }

    /// Dashboard totals: views and likes across the channel's videos, plus subscribers
    #[instrument(skip(self))]
    pub async fn get_channel_stats(&self, channel: ActorId) -> ServiceResult<ChannelStats> {
        self.require_channel(&channel).await?;
        let videos = self.owned_videos(&channel).await?;
        let total_views = videos.iter().map(|video| video.views).sum();

        let mut snapshot = self.ctx.edge_store().snapshot().await?;
        let total_subscribers = snapshot
            .count_edges(&EdgeFilter::SubscribersOf(channel.clone()))
            .await?;
        let total_likes = if videos.is_empty() {
            0
        } else {
            let filter = EdgeFilter::ReactionsOnAny {
                targets: videos.into_iter().map(|video| Target::video(video.id)).collect(),
                kind: ReactionKind::Like,
            };
            snapshot.count_edges(&filter).await?
        };
        snapshot.close().await?;

        Ok(ChannelStats {
            channel,
            total_views,
            total_subscribers,
            total_likes,
        })
    }

    /// Each of the channel's videos with its views and reaction counts
    #[instrument(skip(self))]
    pub async fn list_channel_content_reactions(
        &self,
        channel: ActorId,
    ) -> ServiceResult<Vec<ContentReactionSummary>> {
        self.require_channel(&channel).await?;
        let videos = self.owned_videos(&channel).await?;

        let mut snapshot = self.ctx.edge_store().snapshot().await?;
        let mut rows = Vec::with_capacity(videos.len());
        for video in videos {
            let target = Target::video(video.id);
            let (like_count, dislike_count) = reaction_counts(snapshot.as_mut(), &target).await?;
            rows.push(ContentReactionSummary {
                target,
                views: video.views,
                like_count,
                dislike_count,
            });
        }
        snapshot.close().await?;

        Ok(rows)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn require_channel(&self, channel: &ActorId) -> ServiceResult<()> {
        if self.ctx.channels().channel_exists(channel).await? {
            Ok(())
        } else {
            Err(DomainError::ChannelNotFound(channel.clone()).into())
        }
    }

    async fn require_target(&self, target: &Target) -> ServiceResult<()> {
        match self.ctx.content().owner_of(target).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::InvalidTarget(target.clone()).into()),
        }
    }

    async fn owned_videos(&self, channel: &ActorId) -> ServiceResult<Vec<OwnedContent>> {
        let catalog = self.ctx.content().catalog(TargetType::Video)?;
        Ok(catalog.list_by_owner(channel).await?)
    }
}

async fn reaction_counts(
    snapshot: &mut dyn EdgeSnapshot,
    target: &Target,
) -> Result<(i64, i64), DomainError> {
    let likes = snapshot
        .count_edges(&EdgeFilter::ReactionsOn {
            target: target.clone(),
            kind: ReactionKind::Like,
        })
        .await?;
    let dislikes = snapshot
        .count_edges(&EdgeFilter::ReactionsOn {
            target: target.clone(),
            kind: ReactionKind::Dislike,
        })
        .await?;
    Ok((likes, dislikes))
}
