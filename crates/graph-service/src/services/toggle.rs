//! Toggle engine
//!
//! Each toggle reads the current edge and writes its successor inside one
//! store transaction scoped to the edge's natural key. A transaction that
//! loses a race reports `EdgeConflict`, is rolled back, and the whole toggle
//! is replayed from a fresh read.

use std::future::Future;

use graph_core::entities::{
    Edge, EdgeKey, ReactionEdge, ReactionToggleResult, SubscriptionEdge, SubscriptionToggle,
    SubscriptionToggleResult,
};
use graph_core::traits::RepoResult;
use graph_core::value_objects::{ActorId, ReactionKind, ReactionState, Target};
use graph_core::DomainError;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Toggle service
pub struct ToggleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ToggleService<'a> {
    /// Create a new ToggleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Subscribe to a channel, or unsubscribe if already subscribed
    #[instrument(skip(self))]
    pub async fn toggle_subscription(
        &self,
        subscriber: ActorId,
        channel: ActorId,
    ) -> ServiceResult<SubscriptionToggleResult> {
        if !self.ctx.channels().channel_exists(&channel).await? {
            return Err(DomainError::ChannelNotFound(channel).into());
        }

        if subscriber == channel && !self.ctx.policy().allow_self_subscription {
            return Err(DomainError::SelfSubscription.into());
        }

        let key = EdgeKey::subscription(subscriber.clone(), channel.clone());
        let state = self
            .with_retry(&key, || self.try_toggle_subscription(&subscriber, &channel))
            .await?;

        info!(
            subscriber = %subscriber,
            channel = %channel,
            state = state.as_str(),
            "Subscription toggled"
        );

        Ok(SubscriptionToggleResult {
            subscriber,
            channel,
            state,
        })
    }

    /// Apply a like or dislike to a target.
    ///
    /// Same kind again removes it, the opposite kind replaces it.
    #[instrument(skip(self))]
    pub async fn toggle_reaction(
        &self,
        actor: ActorId,
        target: Target,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionToggleResult> {
        let Some(owner) = self.ctx.content().owner_of(&target).await? else {
            return Err(DomainError::InvalidTarget(target).into());
        };

        if owner == actor && !self.ctx.policy().allow_self_reaction {
            return Err(DomainError::SelfReaction.into());
        }

        let key = EdgeKey::reaction(actor.clone(), target.clone());
        let result = self
            .with_retry(&key, || self.try_toggle_reaction(&actor, &target, kind))
            .await?;

        info!(
            actor = %actor,
            target = %target,
            kind = %kind,
            outcome = ?result.state,
            "Reaction toggled"
        );

        Ok(result)
    }

    // ========================================================================
    // Attempts
    // ========================================================================

    async fn try_toggle_subscription(
        &self,
        subscriber: &ActorId,
        channel: &ActorId,
    ) -> RepoResult<SubscriptionToggle> {
        let key = EdgeKey::subscription(subscriber.clone(), channel.clone());
        let mut tx = self.ctx.edge_store().begin(key.clone()).await?;

        let state = if tx.find_edge(&key).await?.is_some() {
            if !tx.delete_edge(&key).await? {
                return Err(DomainError::EdgeConflict);
            }
            SubscriptionToggle::Unsubscribed
        } else {
            tx.insert_edge(&SubscriptionEdge::new(subscriber.clone(), channel.clone()).into())
                .await?;
            SubscriptionToggle::Subscribed
        };

        tx.commit().await?;
        Ok(state)
    }

    async fn try_toggle_reaction(
        &self,
        actor: &ActorId,
        target: &Target,
        kind: ReactionKind,
    ) -> RepoResult<ReactionToggleResult> {
        let key = EdgeKey::reaction(actor.clone(), target.clone());
        let mut tx = self.ctx.edge_store().begin(key.clone()).await?;

        let current = tx
            .find_edge(&key)
            .await?
            .and_then(Edge::into_reaction)
            .map(|edge| edge.kind);
        let (next, outcome) = ReactionState::from(current).apply(kind);

        if current.is_some() && !tx.delete_edge(&key).await? {
            return Err(DomainError::EdgeConflict);
        }
        if let Some(next_kind) = next.kind() {
            tx.insert_edge(&ReactionEdge::new(actor.clone(), target.clone(), next_kind).into())
                .await?;
        }

        tx.commit().await?;
        Ok(ReactionToggleResult {
            target: target.clone(),
            state: outcome,
            reaction: next,
        })
    }

    /// Run `attempt` until it stops reporting conflicts, up to the configured bound
    async fn with_retry<T, F, Fut>(&self, key: &EdgeKey, mut attempt: F) -> ServiceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RepoResult<T>>,
    {
        let max_attempts = self.ctx.policy().toggle_max_attempts.max(1);

        for n in 1..=max_attempts {
            match attempt().await {
                Err(e) if e.is_conflict() => {
                    warn!(?key, attempt = n, max_attempts, "Edge conflict, retrying toggle");
                    tokio::task::yield_now().await;
                }
                other => return other.map_err(ServiceError::from),
            }
        }

        Err(ServiceError::transient(max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{channel, fixture, flaky_fixture, viewer, VIDEO};
    use graph_common::EdgePolicyConfig;
    use graph_core::entities::EdgeFilter;
    use graph_core::traits::EdgeStore;
    use graph_core::value_objects::ReactionToggle;

    fn likes_on(target: &Target) -> EdgeFilter {
        let target = target.clone();
        EdgeFilter::ReactionsOn {
            target,
            kind: ReactionKind::Like,
        }
    }

    fn dislikes_on(target: &Target) -> EdgeFilter {
        let target = target.clone();
        EdgeFilter::ReactionsOn {
            target,
            kind: ReactionKind::Dislike,
        }
    }

    #[tokio::test]
    async fn test_subscription_toggle_is_idempotent_undo() {
        let f = fixture();
        let service = ToggleService::new(&f.ctx);

        let first = service.toggle_subscription(viewer(1), channel()).await.unwrap();
        assert_eq!(first.state, SubscriptionToggle::Subscribed);

        let second = service.toggle_subscription(viewer(1), channel()).await.unwrap();
        assert_eq!(second.state, SubscriptionToggle::Unsubscribed);

        let key = EdgeKey::subscription(viewer(1), channel());
        assert!(f.store.find_edge(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_subscription_to_unknown_channel() {
        let f = fixture();
        let err = ToggleService::new(&f.ctx)
            .toggle_subscription(viewer(1), ActorId::from(999))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_self_subscription_follows_policy() {
        let f = fixture();
        let result = ToggleService::new(&f.ctx)
            .toggle_subscription(channel(), channel())
            .await
            .unwrap();
        assert!(result.state.is_subscribed());

        let strict = fixture().with_policy(EdgePolicyConfig {
            allow_self_subscription: false,
            ..EdgePolicyConfig::default()
        });
        let err = ToggleService::new(&strict.ctx)
            .toggle_subscription(channel(), channel())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "SELF_SUBSCRIPTION");
    }

    #[tokio::test]
    async fn test_reaction_state_machine() {
        let f = fixture();
        let service = ToggleService::new(&f.ctx);
        let target = Target::video(VIDEO);
        let actor = viewer(1);

        let steps = [
            (ReactionKind::Like, ReactionToggle::Set, ReactionState::Liked),
            (ReactionKind::Dislike, ReactionToggle::Switched, ReactionState::Disliked),
            (ReactionKind::Like, ReactionToggle::Switched, ReactionState::Liked),
            (ReactionKind::Like, ReactionToggle::Cleared, ReactionState::None),
        ];
        for (kind, state, reaction) in steps {
            let r = service
                .toggle_reaction(actor.clone(), target.clone(), kind)
                .await
                .unwrap();
            assert_eq!((r.state, r.reaction), (state, reaction), "{kind}");
        }

        assert_eq!(f.store.count_edges(&likes_on(&target)).await.unwrap(), 0);
        assert_eq!(f.store.count_edges(&dislikes_on(&target)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reaction_kinds_are_exclusive() {
        let f = fixture();
        let service = ToggleService::new(&f.ctx);
        let target = Target::video(VIDEO);

        for (i, kind) in [ReactionKind::Like, ReactionKind::Dislike, ReactionKind::Dislike, ReactionKind::Like, ReactionKind::Dislike]
            .into_iter()
            .enumerate()
        {
            service.toggle_reaction(viewer(1), target.clone(), kind).await.unwrap();
            let likes = f.store.count_edges(&likes_on(&target)).await.unwrap();
            let dislikes = f.store.count_edges(&dislikes_on(&target)).await.unwrap();
            assert!(likes + dislikes <= 1, "step {i}: {likes} likes, {dislikes} dislikes");
        }
    }

    #[tokio::test]
    async fn test_toggles_with_non_numeric_ids() {
        let f = fixture();
        let object_id = ActorId::parse("64f1a2b3c4d5e6f7a8b9c0d1").unwrap();
        f.channels.add_channel(object_id.clone());

        let result = ToggleService::new(&f.ctx)
            .toggle_subscription(viewer(1), object_id.clone())
            .await
            .unwrap();
        assert_eq!(result.channel, object_id);
        assert!(result.state.is_subscribed());
    }

    #[tokio::test]
    async fn test_reaction_on_missing_target_is_rejected() {
        let f = fixture();
        let service = ToggleService::new(&f.ctx);

        for target in [Target::video(404), Target::comment(404), Target::tweet(404)] {
            let err = service
                .toggle_reaction(viewer(1), target, ReactionKind::Like)
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), "INVALID_TARGET");
        }
        assert_eq!(
            f.store.count_edges(&likes_on(&Target::video(404))).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_self_reaction_follows_policy() {
        let f = fixture();
        ToggleService::new(&f.ctx)
            .toggle_reaction(channel(), Target::video(VIDEO), ReactionKind::Like)
            .await
            .unwrap();

        let strict = fixture().with_policy(EdgePolicyConfig {
            allow_self_reaction: false,
            ..EdgePolicyConfig::default()
        });
        let err = ToggleService::new(&strict.ctx)
            .toggle_reaction(channel(), Target::video(VIDEO), ReactionKind::Like)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "SELF_REACTION");
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_conflicts_are_retried() {
        let f = flaky_fixture(2);
        let result = ToggleService::new(&f.ctx)
            .toggle_reaction(viewer(1), Target::video(VIDEO), ReactionKind::Like)
            .await
            .unwrap();
        assert_eq!(result.state, ReactionToggle::Set);
        assert_eq!(f.flaky.attempts(), 3);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_transient() {
        let f = flaky_fixture(u32::MAX);
        let err = ToggleService::new(&f.ctx)
            .toggle_subscription(viewer(1), channel())
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(f.flaky.attempts(), 3);

        let key = EdgeKey::subscription(viewer(1), channel());
        assert!(f.store.find_edge(&key).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscription_toggles() {
        for n in [7_usize, 8] {
            let f = fixture();
            let tasks = (0..n).map(|_| {
                let ctx = f.ctx.clone();
                tokio::spawn(async move {
                    ToggleService::new(&ctx)
                        .toggle_subscription(viewer(1), channel())
                        .await
                })
            });

            for result in futures::future::join_all(tasks).await {
                result.unwrap().unwrap();
            }

            let count = f
                .store
                .count_edges(&EdgeFilter::SubscribersOf(channel()))
                .await
                .unwrap();
            assert_eq!(count, (n % 2) as i64, "{n} concurrent toggles");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reaction_toggles() {
        let f = fixture();
        let target = Target::video(VIDEO);
        let tasks = (0..9).map(|_| {
            let ctx = f.ctx.clone();
            let target = target.clone();
            tokio::spawn(async move {
                ToggleService::new(&ctx)
                    .toggle_reaction(viewer(1), target, ReactionKind::Like)
                    .await
            })
        });

        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        assert_eq!(f.store.count_edges(&likes_on(&target)).await.unwrap(), 1);
        assert_eq!(f.store.count_edges(&dislikes_on(&target)).await.unwrap(), 0);
    }
}
