//! PostgreSQL readers over tables owned by the identity and content services
//!
//! These only read `users`, `videos`, `comments` and `tweets`; the owning
//! services create and migrate them. Their id columns are compared and read
//! as text, so integer, UUID and string keys all work.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use graph_core::entities::OwnedContent;
use graph_core::error::DomainError;
use graph_core::traits::{ChannelDirectory, ContentCatalog, RepoResult};
use graph_core::value_objects::{ActorId, ContentId, TargetType};

use crate::models::OwnedContentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ContentCatalog for one target type
#[derive(Clone)]
pub struct PgContentCatalog {
    pool: PgPool,
    target_type: TargetType,
}

impl PgContentCatalog {
    /// Create a new PgContentCatalog
    pub fn new(pool: PgPool, target_type: TargetType) -> Self {
        Self { pool, target_type }
    }

    /// One catalog per target type, sharing a pool
    pub fn all(pool: &PgPool) -> Vec<Self> {
        TargetType::ALL
            .into_iter()
            .map(|t| Self::new(pool.clone(), t))
            .collect()
    }

    fn owner_sql(&self) -> &'static str {
        match self.target_type {
            TargetType::Video => "SELECT owner_id::text FROM videos WHERE id::text = $1",
            TargetType::Comment => "SELECT owner_id::text FROM comments WHERE id::text = $1",
            TargetType::Tweet => "SELECT owner_id::text FROM tweets WHERE id::text = $1",
        }
    }

    /// Only videos carry a view counter
    fn owned_sql(&self) -> &'static str {
        match self.target_type {
            TargetType::Video => {
                "SELECT id::text AS id, views::BIGINT AS views \
                 FROM videos WHERE owner_id::text = $1 ORDER BY id"
            }
            TargetType::Comment => {
                "SELECT id::text AS id, 0::BIGINT AS views \
                 FROM comments WHERE owner_id::text = $1 ORDER BY id"
            }
            TargetType::Tweet => {
                "SELECT id::text AS id, 0::BIGINT AS views \
                 FROM tweets WHERE owner_id::text = $1 ORDER BY id"
            }
        }
    }
}

#[async_trait]
impl ContentCatalog for PgContentCatalog {
    fn target_type(&self) -> TargetType {
        self.target_type
    }

    #[instrument(skip(self), fields(target_type = %self.target_type))]
    async fn owner_of(&self, id: &ContentId) -> RepoResult<Option<ActorId>> {
        let owner = sqlx::query_scalar::<_, String>(self.owner_sql())
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        owner
            .map(|raw| {
                ActorId::parse(&raw).map_err(|_| {
                    DomainError::DatabaseError(format!(
                        "unexpected {}.owner_id: {raw}",
                        self.target_type
                    ))
                })
            })
            .transpose()
    }

    #[instrument(skip(self), fields(target_type = %self.target_type))]
    async fn list_by_owner(&self, owner: &ActorId) -> RepoResult<Vec<OwnedContent>> {
        let rows = sqlx::query_as::<_, OwnedContentModel>(self.owned_sql())
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(OwnedContent::try_from).collect()
    }
}

/// PostgreSQL implementation of ChannelDirectory over the `users` table
#[derive(Clone)]
pub struct PgChannelDirectory {
    pool: PgPool,
}

impl PgChannelDirectory {
    /// Create a new PgChannelDirectory
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelDirectory for PgChannelDirectory {
    #[instrument(skip(self))]
    async fn channel_exists(&self, channel: &ActorId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id::text = $1)")
            .bind(channel.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
