//! API Integration Tests
//!
//! Most tests run against an in-process server over the in-memory edge
//! store and a seeded set of channels and content. Tests marked as needing
//! PostgreSQL are skipped unless DATABASE_URL is set.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use graph_common::EdgePolicyConfig;
use integration_tests::{
    assert_json, assert_status, fixtures::*, postgres_config, TestServer,
};
use reqwest::StatusCode;

async fn like(server: &TestServer, actor: i64, path: &str) -> ReactionToggleBody {
    let response = server
        .post_auth(&format!("/reactions/{path}/like"), &token_for(actor))
        .await
        .unwrap();
    let body: Envelope<ReactionToggleBody> = assert_json(response, StatusCode::OK).await.unwrap();
    body.data
}

async fn subscribe(
    server: &TestServer,
    subscriber: i64,
    channel: impl std::fmt::Display,
) -> SubscriptionToggleBody {
    let response = server
        .post_auth(&format!("/subscriptions/{channel}"), &token_for(subscriber))
        .await
        .unwrap();
    let body: Envelope<SubscriptionToggleBody> =
        assert_json(response, StatusCode::OK).await.unwrap();
    body.data
}

async fn summary(server: &TestServer, viewer: i64, path: &str) -> SummaryBody {
    let response = server
        .get_auth(&format!("/reactions/{path}"), &token_for(viewer))
        .await
        .unwrap();
    let body: Envelope<SummaryBody> = assert_json(response, StatusCode::OK).await.unwrap();
    body.data
}

async fn profile(server: &TestServer, channel: i64, viewer: i64) -> ProfileBody {
    let response = server
        .get_auth(&format!("/channels/{channel}/profile"), &token_for(viewer))
        .await
        .unwrap();
    let body: Envelope<ProfileBody> = assert_json(response, StatusCode::OK).await.unwrap();
    body.data
}

async fn error_code(response: reqwest::Response, expected_status: StatusCode) -> String {
    let body: ErrorEnvelope = assert_json(response, expected_status).await.unwrap();
    body.error.code
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["edge_store"], "healthy");
}

#[tokio::test]
async fn test_health_ready_with_postgres() {
    let Some(config) = postgres_config() else {
        return;
    };

    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let response = server.get_root("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Scenario
// ============================================================================

#[tokio::test]
async fn test_like_switch_subscribe_scenario() {
    let server = TestServer::start().await.expect("Failed to start server");
    let v1 = format!("video/{V1}");

    let toggled = like(&server, U1, &v1).await;
    assert_eq!(toggled.state, "set");
    let s = summary(&server, U1, &v1).await;
    assert_eq!((s.like_count, s.dislike_count, s.viewer_reaction.as_str()), (1, 0, "like"));

    let response = server
        .post_auth(&format!("/reactions/{v1}/dislike"), &token_for(U1))
        .await
        .unwrap();
    let switched: Envelope<ReactionToggleBody> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(switched.data.state, "switched");
    assert_eq!(switched.data.reaction, "dislike");
    let s = summary(&server, U1, &v1).await;
    assert_eq!((s.like_count, s.dislike_count, s.viewer_reaction.as_str()), (0, 1, "dislike"));

    assert_eq!(subscribe(&server, U2, U1).await.state, "subscribed");
    let seen_by_u2 = profile(&server, U1, U2).await;
    assert_eq!(seen_by_u2.subscriber_count, 1);
    assert!(seen_by_u2.is_subscribed_by_viewer);
    let seen_by_u3 = profile(&server, U1, U3).await;
    assert_eq!(seen_by_u3.subscriber_count, 1);
    assert!(!seen_by_u3.is_subscribed_by_viewer);
    assert_eq!(profile(&server, U2, U3).await.subscribed_to_count, 1);
}

#[tokio::test]
async fn test_toggle_twice_is_undo() {
    let server = TestServer::start().await.expect("Failed to start server");

    subscribe(&server, U2, U1).await;
    let undone = subscribe(&server, U2, U1).await;
    assert_eq!(undone.state, "unsubscribed");
    assert_eq!(profile(&server, U1, U2).await.subscriber_count, 0);

    let comment = format!("comment/{C1}");
    like(&server, U3, &comment).await;
    let cleared = like(&server, U3, &comment).await;
    assert_eq!(cleared.state, "none");
    assert_eq!(cleared.reaction, "none");
    let s = summary(&server, U3, &comment).await;
    assert_eq!((s.like_count, s.dislike_count), (0, 0));
}

#[tokio::test]
async fn test_anonymous_summary() {
    let server = TestServer::start().await.expect("Failed to start server");
    like(&server, U2, &format!("tweet/{T1}")).await;

    let response = server.get(&format!("/reactions/tweet/{T1}")).await.unwrap();
    let body: Envelope<SummaryBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.like_count, 1);
    assert_eq!(body.data.viewer_reaction, "none");
    assert_eq!(
        body.data.target,
        TargetBody {
            target_type: "tweet".to_string(),
            id: T1.to_string(),
        }
    );
}

#[tokio::test]
async fn test_concurrent_likes_by_one_actor() {
    let server = TestServer::start().await.expect("Failed to start server");
    let path = format!("/reactions/video/{V2}/like");
    let token = token_for(U3);

    let responses = join_all((0..5).map(|_| server.post_auth(&path, &token))).await;
    for response in responses {
        assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
    }

    let s = summary(&server, U3, &format!("video/{V2}")).await;
    assert_eq!(s.like_count, 1);
    assert_eq!(s.viewer_reaction, "like");
}

// ============================================================================
// Channel Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_channel_stats_and_content() {
    let server = TestServer::start().await.expect("Failed to start server");
    subscribe(&server, U2, U1).await;
    like(&server, U2, &format!("video/{V1}")).await;
    like(&server, U3, &format!("video/{V1}")).await;
    like(&server, U3, &format!("video/{V2}")).await;
    like(&server, U2, &format!("comment/{C1}")).await;

    let response = server
        .get_auth(&format!("/channels/{U1}/stats"), &token_for(U1))
        .await
        .unwrap();
    let stats: Envelope<StatsBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.data.channel_id, U1.to_string());
    assert_eq!(stats.data.total_views, V1_VIEWS + V2_VIEWS);
    assert_eq!(stats.data.total_subscribers, 1);
    assert_eq!(stats.data.total_likes, 3);

    let response = server
        .get_auth(&format!("/channels/{U1}/content"), &token_for(U1))
        .await
        .unwrap();
    let rows: Envelope<Vec<ContentRowBody>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rows.data.len(), 2);
    let v1 = rows
        .data
        .iter()
        .find(|row| row.target.id == V1.to_string())
        .unwrap();
    assert_eq!((v1.views, v1.like_count, v1.dislike_count), (V1_VIEWS, 2, 0));
}

#[tokio::test]
async fn test_stats_require_auth() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get(&format!("/channels/{U1}/stats")).await.unwrap();
    assert_eq!(
        error_code(response, StatusCode::UNAUTHORIZED).await,
        "MISSING_AUTHORIZATION"
    );

    let response = server
        .get_auth(&format!("/channels/{U1}/stats"), "not-a-token")
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_channel() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.post_auth("/subscriptions/999", &token_for(U2)).await.unwrap();
    assert_eq!(error_code(response, StatusCode::NOT_FOUND).await, "UNKNOWN_CHANNEL");

    let response = server.get("/channels/999/profile").await.unwrap();
    assert_eq!(error_code(response, StatusCode::NOT_FOUND).await, "UNKNOWN_CHANNEL");
}

#[tokio::test]
async fn test_invalid_targets() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = token_for(U2);

    let response = server.post_auth("/reactions/video/9999/like", &token).await.unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "INVALID_TARGET");

    // A comment id does not name a video
    let response = server
        .post_auth(&format!("/reactions/video/{C1}/like"), &token)
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "INVALID_TARGET");

    let response = server.post_auth("/reactions/playlist/1/like", &token).await.unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_TARGET_TYPE"
    );

    let response = server
        .post_auth(&format!("/reactions/video/{V1}/love"), &token)
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_REACTION_KIND"
    );
}

#[tokio::test]
async fn test_self_edges_when_disallowed() {
    let server = TestServer::start_with_policy(EdgePolicyConfig {
        allow_self_subscription: false,
        allow_self_reaction: false,
        ..EdgePolicyConfig::default()
    })
    .await
    .expect("Failed to start server");

    let response = server
        .post_auth(&format!("/subscriptions/{U1}"), &token_for(U1))
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "SELF_SUBSCRIPTION");

    let response = server
        .post_auth(&format!("/reactions/video/{V1}/like"), &token_for(U1))
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "SELF_REACTION");
}

// ============================================================================
// Identifier Tests
// ============================================================================

#[tokio::test]
async fn test_object_id_actors_and_targets() {
    let server = TestServer::start().await.expect("Failed to start server");
    let oid_token = token_for_id(&object_id(OID_CHANNEL));

    let toggled = subscribe(&server, U2, OID_CHANNEL).await;
    assert_eq!(toggled.channel_id, OID_CHANNEL);
    assert_eq!(toggled.state, "subscribed");

    let liked = like(&server, U2, &format!("tweet/{OID_TWEET}")).await;
    assert_eq!(liked.target.id, OID_TWEET);

    let response = server
        .get_auth(&format!("/channels/{OID_CHANNEL}/profile"), &oid_token)
        .await
        .unwrap();
    let body: Envelope<ProfileBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.channel_id, OID_CHANNEL);
    assert_eq!(body.data.subscriber_count, 1);

    let tweet = summary(&server, U2, &format!("tweet/{OID_TWEET}")).await;
    assert_eq!(tweet.target.id, OID_TWEET);
    assert_eq!(tweet.like_count, 1);
    assert_eq!(tweet.viewer_reaction, "like");

    let response = server
        .get_auth(&format!("/channels/{OID_CHANNEL}/stats"), &oid_token)
        .await
        .unwrap();
    let stats: Envelope<StatsBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.data.total_subscribers, 1);
    assert_eq!(stats.data.total_likes, 0);

    let response = server
        .post_auth("/reactions/tweet/a:b/like", &token_for(U2))
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_PATH_PARAMETER"
    );
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_subscribers_pagination() {
    let server = TestServer::start().await.expect("Failed to start server");
    subscribe(&server, U2, U1).await;
    subscribe(&server, U3, U1).await;
    let token = token_for(U1);

    let response = server
        .get_auth(&format!("/channels/{U1}/subscribers?limit=1"), &token)
        .await
        .unwrap();
    let first: Page<SubscriberBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.data.len(), 1);
    assert!(first.pagination.has_more);
    assert_eq!(first.pagination.limit, 1);
    let after = first.pagination.after.clone().unwrap();

    let response = server
        .get_auth(
            &format!("/channels/{U1}/subscribers?limit=1&after={after}"),
            &token,
        )
        .await
        .unwrap();
    let second: Page<SubscriberBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(second.data.len(), 1);
    assert!(!second.pagination.has_more);
    assert!(second.pagination.after.is_none());

    let mut seen = vec![
        first.data[0].subscriber_id.clone(),
        second.data[0].subscriber_id.clone(),
    ];
    seen.sort();
    assert_eq!(seen, vec![U2.to_string(), U3.to_string()]);
}

#[tokio::test]
async fn test_bad_pagination_params() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = token_for(U2);

    let response = server
        .get_auth("/users/@me/subscriptions?limit=500", &token)
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "VALIDATION_ERROR");

    let response = server
        .get_auth("/users/@me/subscriptions?after=tomorrow", &token)
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_QUERY_PARAMETER"
    );
}

#[tokio::test]
async fn test_my_subscriptions() {
    let server = TestServer::start().await.expect("Failed to start server");
    subscribe(&server, U3, U1).await;
    subscribe(&server, U3, U2).await;

    let response = server
        .get_auth("/users/@me/subscriptions", &token_for(U3))
        .await
        .unwrap();
    let page: Page<SubscriptionBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let mut channels: Vec<_> = page.data.into_iter().map(|s| s.channel_id).collect();
    channels.sort();
    assert_eq!(channels, vec![U1.to_string(), U2.to_string()]);
    assert!(!page.pagination.has_more);
}

#[tokio::test]
async fn test_channel_subscriptions() {
    let server = TestServer::start().await.expect("Failed to start server");
    subscribe(&server, U3, U1).await;
    subscribe(&server, U3, OID_CHANNEL).await;

    let response = server
        .get_auth(&format!("/channels/{U3}/subscriptions"), &token_for(U1))
        .await
        .unwrap();
    let page: Page<SubscriptionBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let mut channels: Vec<_> = page.data.into_iter().map(|s| s.channel_id).collect();
    channels.sort();
    assert_eq!(channels, vec![U1.to_string(), OID_CHANNEL.to_string()]);

    let response = server
        .get_auth("/channels/999/subscriptions", &token_for(U1))
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::NOT_FOUND).await, "UNKNOWN_CHANNEL");
}

#[tokio::test]
async fn test_reactors_and_my_reactions() {
    let server = TestServer::start().await.expect("Failed to start server");
    like(&server, U2, &format!("video/{V1}")).await;
    like(&server, U3, &format!("video/{V1}")).await;
    like(&server, U2, &format!("tweet/{T1}")).await;

    let response = server
        .get_auth(&format!("/reactions/video/{V1}/like/actors"), &token_for(U1))
        .await
        .unwrap();
    let reactors: Page<ReactorBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let mut actors: Vec<_> = reactors.data.iter().map(|r| r.actor_id.clone()).collect();
    actors.sort();
    assert_eq!(actors, vec![U2.to_string(), U3.to_string()]);
    assert!(reactors.data.iter().all(|r| r.kind == "like"));

    let response = server
        .get_auth("/users/@me/reactions/like", &token_for(U2))
        .await
        .unwrap();
    let liked: Page<ReactedTargetBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked.data.len(), 2);

    let response = server
        .get_auth("/users/@me/reactions/like?type=tweet", &token_for(U2))
        .await
        .unwrap();
    let liked_tweets: Page<ReactedTargetBody> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked_tweets.data.len(), 1);
    assert_eq!(liked_tweets.data[0].target.target_type, "tweet");

    let response = server
        .get_auth("/users/@me/reactions/dislike", &token_for(U2))
        .await
        .unwrap();
    let disliked: Page<ReactedTargetBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(disliked.data.is_empty());
}
