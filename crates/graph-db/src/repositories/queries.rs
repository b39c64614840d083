//! Edge queries shared by the pool, transaction and snapshot paths
//!
//! Every function takes any PostgreSQL executor so the same SQL runs against
//! the pool directly or inside an open transaction.

use sqlx::PgExecutor;

use graph_core::entities::{Edge, EdgeFilter, EdgeKey, EdgePage, ReactionEdge, SubscriptionEdge};
use graph_core::error::DomainError;
use graph_core::traits::RepoResult;
use graph_core::value_objects::{ActorId, Target};

use crate::models::{ReactionEdgeModel, SubscriptionEdgeModel};

use super::error::{map_db_error, map_write_error};

// ============================================================================
// Lookups and writes by natural key
// ============================================================================

pub(crate) async fn find_edge<'e, E>(executor: E, key: &EdgeKey) -> RepoResult<Option<Edge>>
where
    E: PgExecutor<'e>,
{
    match key {
        EdgeKey::Subscription {
            subscriber,
            channel,
        } => {
            let row = sqlx::query_as::<_, SubscriptionEdgeModel>(
                r#"
                SELECT subscriber_id, channel_id, created_at
                FROM subscription_edges
                WHERE subscriber_id = $1 AND channel_id = $2
                "#,
            )
            .bind(subscriber.as_str())
            .bind(channel.as_str())
            .fetch_optional(executor)
            .await
            .map_err(map_db_error)?;

            row.map(|m| SubscriptionEdge::try_from(m).map(Edge::Subscription))
                .transpose()
        }
        EdgeKey::Reaction { actor, target } => {
            let row = sqlx::query_as::<_, ReactionEdgeModel>(
                r#"
                SELECT actor_id, target_type, target_id, kind, created_at
                FROM reaction_edges
                WHERE actor_id = $1 AND target_type = $2 AND target_id = $3
                "#,
            )
            .bind(actor.as_str())
            .bind(target.target_type.as_str())
            .bind(target.id.as_str())
            .fetch_optional(executor)
            .await
            .map_err(map_db_error)?;

            row.map(|m| ReactionEdge::try_from(m).map(Edge::Reaction))
                .transpose()
        }
    }
}

/// Insert unless the natural key is taken; a taken key is `EdgeConflict`
pub(crate) async fn insert_edge<'e, E>(executor: E, edge: &Edge) -> RepoResult<Edge>
where
    E: PgExecutor<'e>,
{
    let inserted = match edge {
        Edge::Subscription(e) => sqlx::query_as::<_, SubscriptionEdgeModel>(
            r#"
            INSERT INTO subscription_edges (subscriber_id, channel_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING subscriber_id, channel_id, created_at
            "#,
        )
        .bind(e.subscriber.as_str())
        .bind(e.channel.as_str())
        .bind(e.created_at)
        .fetch_optional(executor)
        .await
        .map_err(map_write_error)?
        .map(SubscriptionEdge::try_from)
        .transpose()?
        .map(Edge::Subscription),

        Edge::Reaction(e) => sqlx::query_as::<_, ReactionEdgeModel>(
            r#"
            INSERT INTO reaction_edges (actor_id, target_type, target_id, kind, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING actor_id, target_type, target_id, kind, created_at
            "#,
        )
        .bind(e.actor.as_str())
        .bind(e.target.target_type.as_str())
        .bind(e.target.id.as_str())
        .bind(e.kind.as_str())
        .bind(e.created_at)
        .fetch_optional(executor)
        .await
        .map_err(map_write_error)?
        .map(ReactionEdge::try_from)
        .transpose()?
        .map(Edge::Reaction),
    };

    inserted.ok_or(DomainError::EdgeConflict)
}

pub(crate) async fn delete_edge<'e, E>(executor: E, key: &EdgeKey) -> RepoResult<bool>
where
    E: PgExecutor<'e>,
{
    let result = match key {
        EdgeKey::Subscription {
            subscriber,
            channel,
        } => {
            sqlx::query(
                r#"
                DELETE FROM subscription_edges WHERE subscriber_id = $1 AND channel_id = $2
                "#,
            )
            .bind(subscriber.as_str())
            .bind(channel.as_str())
            .execute(executor)
            .await
        }
        EdgeKey::Reaction { actor, target } => {
            sqlx::query(
                r#"
                DELETE FROM reaction_edges
                WHERE actor_id = $1 AND target_type = $2 AND target_id = $3
                "#,
            )
            .bind(actor.as_str())
            .bind(target.target_type.as_str())
            .bind(target.id.as_str())
            .execute(executor)
            .await
        }
    };

    Ok(result.map_err(map_write_error)?.rows_affected() > 0)
}

// ============================================================================
// Counting and listing by partial key
// ============================================================================

fn unzip_targets(targets: &[Target]) -> (Vec<String>, Vec<String>) {
    targets
        .iter()
        .map(|t| (t.target_type.as_str().to_string(), t.id.to_string()))
        .unzip()
}

pub(crate) async fn count_edges<'e, E>(executor: E, filter: &EdgeFilter) -> RepoResult<i64>
where
    E: PgExecutor<'e>,
{
    let count = match filter {
        EdgeFilter::SubscribersOf(channel) => {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM subscription_edges WHERE channel_id = $1
                "#,
            )
            .bind(channel.as_str())
            .fetch_one(executor)
            .await
        }
        EdgeFilter::SubscriptionsOf(subscriber) => {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM subscription_edges WHERE subscriber_id = $1
                "#,
            )
            .bind(subscriber.as_str())
            .fetch_one(executor)
            .await
        }
        EdgeFilter::ReactionsOn { target, kind } => {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM reaction_edges
                WHERE target_type = $1 AND target_id = $2 AND kind = $3
                "#,
            )
            .bind(target.target_type.as_str())
            .bind(target.id.as_str())
            .bind(kind.as_str())
            .fetch_one(executor)
            .await
        }
        EdgeFilter::ReactionsOnAny { targets, kind } => {
            if targets.is_empty() {
                return Ok(0);
            }
            let (types, ids) = unzip_targets(targets);
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM reaction_edges
                WHERE kind = $1
                  AND (target_type, target_id) IN (SELECT * FROM UNNEST($2::text[], $3::text[]))
                "#,
            )
            .bind(kind.as_str())
            .bind(types)
            .bind(ids)
            .fetch_one(executor)
            .await
        }
        EdgeFilter::ReactionsBy {
            actor,
            target_type,
            kind,
        } => {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM reaction_edges
                WHERE actor_id = $1 AND kind = $2 AND ($3::text IS NULL OR target_type = $3)
                "#,
            )
            .bind(actor.as_str())
            .bind(kind.as_str())
            .bind(target_type.map(|t| t.as_str()))
            .fetch_one(executor)
            .await
        }
    };

    count.map_err(map_db_error)
}

/// Page of subscriptions anchored on one endpoint. `sql` binds the anchor as
/// $1, the cursor as $2/$3 and the limit as $4.
async fn list_subscriptions<'e, E>(
    executor: E,
    sql: &'static str,
    anchor: &ActorId,
    page: &EdgePage,
) -> RepoResult<Vec<Edge>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, SubscriptionEdgeModel>(sql)
        .bind(anchor.as_str())
        .bind(page.after.as_ref().map(|c| c.created_at))
        .bind(page.after.as_ref().map(|c| c.tiebreak.as_str()))
        .bind(i64::from(page.limit))
        .fetch_all(executor)
        .await
        .map_err(map_db_error)?;

    rows.into_iter()
        .map(|m| SubscriptionEdge::try_from(m).map(Edge::Subscription))
        .collect()
}

fn into_reaction_edges(rows: Vec<ReactionEdgeModel>) -> RepoResult<Vec<Edge>> {
    rows.into_iter()
        .map(|m| ReactionEdge::try_from(m).map(Edge::Reaction))
        .collect()
}

/// List edges newest first, keyed by the filter's sort key descending:
/// `(created_at, counterpart)`, or `(created_at, target_type, target_id)` for
/// reactions listed by actor
pub(crate) async fn list_edges<'e, E>(
    executor: E,
    filter: &EdgeFilter,
    page: EdgePage,
) -> RepoResult<Vec<Edge>>
where
    E: PgExecutor<'e>,
{
    let cursor = page.after.as_ref();
    let cursor_at = cursor.map(|c| c.created_at);
    let cursor_id = cursor.map(|c| c.tiebreak.as_str());
    let limit = i64::from(page.limit);

    match filter {
        EdgeFilter::SubscribersOf(channel) => {
            list_subscriptions(
                executor,
                r#"
                SELECT subscriber_id, channel_id, created_at
                FROM subscription_edges
                WHERE channel_id = $1
                  AND ($2::timestamptz IS NULL
                       OR (created_at, subscriber_id) < ($2::timestamptz, $3::text))
                ORDER BY created_at DESC, subscriber_id DESC
                LIMIT $4
                "#,
                channel,
                &page,
            )
            .await
        }
        EdgeFilter::SubscriptionsOf(subscriber) => {
            list_subscriptions(
                executor,
                r#"
                SELECT subscriber_id, channel_id, created_at
                FROM subscription_edges
                WHERE subscriber_id = $1
                  AND ($2::timestamptz IS NULL
                       OR (created_at, channel_id) < ($2::timestamptz, $3::text))
                ORDER BY created_at DESC, channel_id DESC
                LIMIT $4
                "#,
                subscriber,
                &page,
            )
            .await
        }
        EdgeFilter::ReactionsOn { target, kind } => {
            let rows = sqlx::query_as::<_, ReactionEdgeModel>(
                r#"
                SELECT actor_id, target_type, target_id, kind, created_at
                FROM reaction_edges
                WHERE target_type = $1 AND target_id = $2 AND kind = $3
                  AND ($4::timestamptz IS NULL
                       OR (created_at, actor_id) < ($4::timestamptz, $5::text))
                ORDER BY created_at DESC, actor_id DESC
                LIMIT $6
                "#,
            )
            .bind(target.target_type.as_str())
            .bind(target.id.as_str())
            .bind(kind.as_str())
            .bind(cursor_at)
            .bind(cursor_id)
            .bind(limit)
            .fetch_all(executor)
            .await
            .map_err(map_db_error)?;

            into_reaction_edges(rows)
        }
        EdgeFilter::ReactionsOnAny { targets, kind } => {
            if targets.is_empty() {
                return Ok(Vec::new());
            }
            let (types, ids) = unzip_targets(targets);
            let rows = sqlx::query_as::<_, ReactionEdgeModel>(
                r#"
                SELECT actor_id, target_type, target_id, kind, created_at
                FROM reaction_edges
                WHERE kind = $1
                  AND (target_type, target_id) IN (SELECT * FROM UNNEST($2::text[], $3::text[]))
                  AND ($4::timestamptz IS NULL
                       OR (created_at, actor_id) < ($4::timestamptz, $5::text))
                ORDER BY created_at DESC, actor_id DESC
                LIMIT $6
                "#,
            )
            .bind(kind.as_str())
            .bind(types)
            .bind(ids)
            .bind(cursor_at)
            .bind(cursor_id)
            .bind(limit)
            .fetch_all(executor)
            .await
            .map_err(map_db_error)?;

            into_reaction_edges(rows)
        }
        EdgeFilter::ReactionsBy {
            actor,
            target_type,
            kind,
        } => {
            let rows = sqlx::query_as::<_, ReactionEdgeModel>(
                r#"
                SELECT actor_id, target_type, target_id, kind, created_at
                FROM reaction_edges
                WHERE actor_id = $1 AND kind = $2
                  AND ($3::text IS NULL OR target_type = $3)
                  AND ($4::timestamptz IS NULL
                       OR (created_at, target_type, target_id)
                          < ($4::timestamptz, $5::text, $6::text))
                ORDER BY created_at DESC, target_type DESC, target_id DESC
                LIMIT $7
                "#,
            )
            .bind(actor.as_str())
            .bind(kind.as_str())
            .bind(target_type.map(|t| t.as_str()))
            .bind(cursor_at)
            .bind(cursor.map(|c| c.target_type.map_or("", |t| t.as_str())))
            .bind(cursor_id)
            .bind(limit)
            .fetch_all(executor)
            .await
            .map_err(map_db_error)?;

            into_reaction_edges(rows)
        }
    }
}

// ============================================================================
// Transaction scoping
// ============================================================================

/// Stable 64-bit id for a natural key, used as a transaction-scoped advisory
/// lock so transactions on the same key queue instead of racing.
///
/// FNV-1a over the key's fields joined by NUL, which ids never contain;
/// stable across builds and processes.
pub(crate) fn advisory_lock_id(key: &EdgeKey) -> i64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let fields: [&str; 4] = match key {
        EdgeKey::Subscription {
            subscriber,
            channel,
        } => ["s", subscriber.as_str(), channel.as_str(), ""],
        EdgeKey::Reaction { actor, target } => [
            "r",
            actor.as_str(),
            target.target_type.as_str(),
            target.id.as_str(),
        ],
    };

    let hash = fields
        .iter()
        .flat_map(|field| field.bytes().chain(std::iter::once(0)))
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));
    hash as i64
}

pub(crate) async fn lock_key<'e, E>(executor: E, key: &EdgeKey) -> RepoResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(advisory_lock_id(key))
        .execute(executor)
        .await
        .map_err(map_db_error)?;
    Ok(())
}
