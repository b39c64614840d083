//! Test fixtures and response shapes
//!
//! A small seeded world of channels and content, bearer tokens for its
//! actors, and typed views of the JSON the API returns.

use std::sync::Arc;

use graph_common::JwtService;
use graph_core::traits::ContentRegistry;
use graph_core::{ActorId, ContentId, TargetType};
use graph_db::{MemoryChannelDirectory, MemoryContentCatalog};
use serde::Deserialize;

/// Secret shared by the test server and the token issuer
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Channels (every user is a channel)
pub const U1: i64 = 1;
pub const U2: i64 = 2;
pub const U3: i64 = 3;

/// Videos owned by U1
pub const V1: i64 = 100;
pub const V2: i64 = 101;
pub const V1_VIEWS: i64 = 100;
pub const V2_VIEWS: i64 = 40;

/// Comment by U2
pub const C1: i64 = 200;

/// Tweet by U3
pub const T1: i64 = 300;

/// A channel keyed by a document-store object id
pub const OID_CHANNEL: &str = "64f1a2b3c4d5e6f7a8b9c0d1";

/// Tweet by OID_CHANNEL, also keyed by an object id
pub const OID_TWEET: &str = "64f1a2b3c4d5e6f7a8b9c0d2";

pub fn object_id(raw: &str) -> ActorId {
    raw.parse().expect("object ids are valid actor ids")
}

/// Seeded channel directory and content catalogs
pub struct World {
    pub channels: Arc<MemoryChannelDirectory>,
    pub videos: Arc<MemoryContentCatalog>,
    pub comments: Arc<MemoryContentCatalog>,
    pub tweets: Arc<MemoryContentCatalog>,
}

impl World {
    pub fn seeded() -> Self {
        let channels = Arc::new(MemoryChannelDirectory::with_channels(
            [U1, U2, U3]
                .map(ActorId::from)
                .into_iter()
                .chain([object_id(OID_CHANNEL)]),
        ));

        let videos = Arc::new(MemoryContentCatalog::new(TargetType::Video));
        videos.add(V1, ActorId::from(U1), V1_VIEWS);
        videos.add(V2, ActorId::from(U1), V2_VIEWS);

        let comments = Arc::new(MemoryContentCatalog::new(TargetType::Comment));
        comments.add(C1, ActorId::from(U2), 0);

        let tweets = Arc::new(MemoryContentCatalog::new(TargetType::Tweet));
        tweets.add(T1, ActorId::from(U3), 0);
        tweets.add(
            OID_TWEET.parse::<ContentId>().expect("object ids are valid content ids"),
            object_id(OID_CHANNEL),
            0,
        );

        Self {
            channels,
            videos,
            comments,
            tweets,
        }
    }

    pub fn content(&self) -> ContentRegistry {
        ContentRegistry::new()
            .with(self.videos.clone())
            .with(self.comments.clone())
            .with(self.tweets.clone())
    }
}

/// Issue an access token for an actor
pub fn token_for(actor: i64) -> String {
    token_for_id(&ActorId::from(actor))
}

pub fn token_for_id(actor: &ActorId) -> String {
    JwtService::new(TEST_JWT_SECRET, 900)
        .issue_access_token(actor)
        .expect("Failed to issue test token")
}

/// `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `{ "data": [...], "pagination": {...} }`
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub after: Option<String>,
    pub has_more: bool,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetBody {
    #[serde(rename = "type")]
    pub target_type: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionToggleBody {
    pub subscriber_id: String,
    pub channel_id: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactionToggleBody {
    pub target: TargetBody,
    pub state: String,
    pub reaction: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub channel_id: String,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed_by_viewer: bool,
}

#[derive(Debug, Deserialize)]
pub struct SummaryBody {
    pub target: TargetBody,
    pub like_count: i64,
    pub dislike_count: i64,
    pub viewer_reaction: String,
}

#[derive(Debug, Deserialize)]
pub struct StatsBody {
    pub channel_id: String,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

#[derive(Debug, Deserialize)]
pub struct ContentRowBody {
    pub target: TargetBody,
    pub views: i64,
    pub like_count: i64,
    pub dislike_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubscriberBody {
    pub subscriber_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionBody {
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactorBody {
    pub actor_id: String,
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactedTargetBody {
    pub target: TargetBody,
    pub kind: String,
}

/// `{ "error": { "code", "message" } }`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
