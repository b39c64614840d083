//! PostgreSQL implementation of EdgeStore
//!
//! Natural keys are the tables' primary keys, so uniqueness holds no matter
//! how many service instances write concurrently. Transactions on a key take
//! a transaction-scoped advisory lock on it, and snapshots are
//! `REPEATABLE READ, READ ONLY` transactions.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use graph_core::entities::{Edge, EdgeFilter, EdgeKey, EdgePage};
use graph_core::traits::{EdgeSnapshot, EdgeStore, EdgeTransaction, RepoResult};

use super::error::{map_db_error, map_write_error};
use super::queries;

/// PostgreSQL implementation of EdgeStore
#[derive(Clone)]
pub struct PgEdgeStore {
    pool: PgPool,
}

impl PgEdgeStore {
    /// Create a new PgEdgeStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EdgeStore for PgEdgeStore {
    #[instrument(skip(self))]
    async fn find_edge(&self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        queries::find_edge(&self.pool, key).await
    }

    #[instrument(skip(self))]
    async fn insert_edge(&self, edge: &Edge) -> RepoResult<Edge> {
        queries::insert_edge(&self.pool, edge).await
    }

    #[instrument(skip(self))]
    async fn delete_edge(&self, key: &EdgeKey) -> RepoResult<bool> {
        queries::delete_edge(&self.pool, key).await
    }

    #[instrument(skip(self))]
    async fn count_edges(&self, filter: &EdgeFilter) -> RepoResult<i64> {
        queries::count_edges(&self.pool, filter).await
    }

    #[instrument(skip(self))]
    async fn list_edges(&self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>> {
        queries::list_edges(&self.pool, filter, page).await
    }

    #[instrument(skip(self))]
    async fn begin(&self, key: EdgeKey) -> RepoResult<Box<dyn EdgeTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        queries::lock_key(&mut *tx, &key).await?;
        debug!("Edge transaction opened");

        Ok(Box::new(PgEdgeTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn snapshot(&self) -> RepoResult<Box<dyn EdgeSnapshot>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Ok(Box::new(PgEdgeSnapshot { tx }))
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// Read-committed transaction holding the advisory lock for one key.
///
/// Dropping it without `commit` rolls back.
pub struct PgEdgeTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl EdgeTransaction for PgEdgeTransaction {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        queries::find_edge(&mut *self.tx, key).await
    }

    async fn insert_edge(&mut self, edge: &Edge) -> RepoResult<Edge> {
        queries::insert_edge(&mut *self.tx, edge).await
    }

    async fn delete_edge(&mut self, key: &EdgeKey) -> RepoResult<bool> {
        queries::delete_edge(&mut *self.tx, key).await
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_write_error)
    }
}

/// Repeatable-read, read-only view of the edge tables
pub struct PgEdgeSnapshot {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl EdgeSnapshot for PgEdgeSnapshot {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        queries::find_edge(&mut *self.tx, key).await
    }

    async fn count_edges(&mut self, filter: &EdgeFilter) -> RepoResult<i64> {
        queries::count_edges(&mut *self.tx, filter).await
    }

    async fn list_edges(&mut self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>> {
        queries::list_edges(&mut *self.tx, filter, page).await
    }

    async fn close(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
