//! Shared fixtures for service tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use graph_common::EdgePolicyConfig;
use graph_core::entities::{Edge, EdgeFilter, EdgeKey, EdgePage};
use graph_core::traits::{
    ContentRegistry, EdgeSnapshot, EdgeStore, EdgeTransaction, RepoResult,
};
use graph_core::value_objects::{ActorId, TargetType};
use graph_core::DomainError;
use graph_db::{MemoryChannelDirectory, MemoryContentCatalog, MemoryEdgeStore};

use super::context::ServiceContext;

pub const VIDEO: i64 = 10;
pub const OTHER_VIDEO: i64 = 11;
pub const COMMENT: i64 = 20;
pub const TWEET: i64 = 30;

/// Owner of the seeded content
pub fn channel() -> ActorId {
    ActorId::from(1)
}

pub fn viewer(n: i64) -> ActorId {
    ActorId::from(100 + n)
}

pub struct Fixture {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryEdgeStore>,
    pub videos: Arc<MemoryContentCatalog>,
    pub channels: Arc<MemoryChannelDirectory>,
    registry: ContentRegistry,
}

impl Fixture {
    pub fn with_policy(self, policy: EdgePolicyConfig) -> Self {
        let ctx = ServiceContext::new(
            self.store.clone(),
            self.channels.clone(),
            self.registry.clone(),
            policy,
        );
        Self { ctx, ..self }
    }
}

/// Memory store seeded with one channel, two videos, a comment and a tweet
pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryEdgeStore::new());
    let (channels, videos, registry) = seed();
    let ctx = ServiceContext::new(
        store.clone(),
        channels.clone(),
        registry.clone(),
        EdgePolicyConfig::default(),
    );

    Fixture {
        ctx,
        store,
        videos,
        channels,
        registry,
    }
}

fn seed() -> (
    Arc<MemoryChannelDirectory>,
    Arc<MemoryContentCatalog>,
    ContentRegistry,
) {
    let channels = Arc::new(MemoryChannelDirectory::with_channels(
        std::iter::once(channel()).chain((1..=10).map(viewer)),
    ));

    let videos = Arc::new(MemoryContentCatalog::new(TargetType::Video));
    videos.add(VIDEO, channel(), 100);
    videos.add(OTHER_VIDEO, channel(), 50);

    let comments = Arc::new(MemoryContentCatalog::new(TargetType::Comment));
    comments.add(COMMENT, viewer(1), 0);

    let tweets = Arc::new(MemoryContentCatalog::new(TargetType::Tweet));
    tweets.add(TWEET, channel(), 0);

    let registry = ContentRegistry::new()
        .with(videos.clone())
        .with(comments)
        .with(tweets);

    (channels, videos, registry)
}

// ============================================================================
// Conflict injection
// ============================================================================

/// Edge store whose transactions fail to commit with a conflict a fixed
/// number of times before behaving normally
pub struct FlakyEdgeStore {
    inner: MemoryEdgeStore,
    failures_left: AtomicU32,
    attempts: AtomicU32,
}

impl FlakyEdgeStore {
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn should_fail(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

struct FlakyTransaction {
    inner: Box<dyn EdgeTransaction>,
    fail: bool,
}

#[async_trait]
impl EdgeTransaction for FlakyTransaction {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        self.inner.find_edge(key).await
    }

    async fn insert_edge(&mut self, edge: &Edge) -> RepoResult<Edge> {
        self.inner.insert_edge(edge).await
    }

    async fn delete_edge(&mut self, key: &EdgeKey) -> RepoResult<bool> {
        self.inner.delete_edge(key).await
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        if self.fail {
            return Err(DomainError::EdgeConflict);
        }
        self.inner.commit().await
    }
}

#[async_trait]
impl EdgeStore for FlakyEdgeStore {
    async fn find_edge(&self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        self.inner.find_edge(key).await
    }

    async fn insert_edge(&self, edge: &Edge) -> RepoResult<Edge> {
        self.inner.insert_edge(edge).await
    }

    async fn delete_edge(&self, key: &EdgeKey) -> RepoResult<bool> {
        self.inner.delete_edge(key).await
    }

    async fn count_edges(&self, filter: &EdgeFilter) -> RepoResult<i64> {
        self.inner.count_edges(filter).await
    }

    async fn list_edges(&self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>> {
        self.inner.list_edges(filter, page).await
    }

    async fn begin(&self, key: EdgeKey) -> RepoResult<Box<dyn EdgeTransaction>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.begin(key).await?;
        Ok(Box::new(FlakyTransaction {
            inner,
            fail: self.should_fail(),
        }))
    }

    async fn snapshot(&self) -> RepoResult<Box<dyn EdgeSnapshot>> {
        self.inner.snapshot().await
    }

    async fn ping(&self) -> RepoResult<()> {
        self.inner.ping().await
    }
}

pub struct FlakyFixture {
    pub ctx: ServiceContext,
    /// Same tables the flaky store writes through to
    pub store: MemoryEdgeStore,
    pub flaky: Arc<FlakyEdgeStore>,
}

/// Fixture whose first `failures` commits report a conflict
pub fn flaky_fixture(failures: u32) -> FlakyFixture {
    let store = MemoryEdgeStore::new();
    let flaky = Arc::new(FlakyEdgeStore {
        inner: store.clone(),
        failures_left: AtomicU32::new(failures),
        attempts: AtomicU32::new(0),
    });
    let (channels, _, registry) = seed();
    let ctx = ServiceContext::new(
        flaky.clone(),
        channels,
        registry,
        EdgePolicyConfig::default(),
    );

    FlakyFixture { ctx, store, flaky }
}
