//! Edge Store port - keyed storage for subscription and reaction edges
//!
//! The store is the only component that mutates edges. It enforces natural
//! key uniqueness itself: inserting an edge whose key is already present
//! fails with [`DomainError::EdgeConflict`](crate::DomainError::EdgeConflict)
//! no matter which kind the stored reaction has.
//!
//! Multi-step mutations go through [`EdgeTransaction`], and multi-read queries
//! go through [`EdgeSnapshot`] so every count they combine comes from the
//! same state.

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::{Edge, EdgeFilter, EdgeKey, EdgePage};

#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Exact lookup by natural key
    async fn find_edge(&self, key: &EdgeKey) -> RepoResult<Option<Edge>>;

    /// Insert a new edge, failing with `EdgeConflict` if its key is taken
    async fn insert_edge(&self, edge: &Edge) -> RepoResult<Edge>;

    /// Delete the edge with this key; `false` if there was none
    async fn delete_edge(&self, key: &EdgeKey) -> RepoResult<bool>;

    /// Count edges selected by a filter
    async fn count_edges(&self, filter: &EdgeFilter) -> RepoResult<i64>;

    /// List edges selected by a filter, newest first
    async fn list_edges(&self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>>;

    /// Open a unit of work on a single natural key.
    ///
    /// Transactions on the same key are serialized or detected as conflicting
    /// at commit; dropping the transaction without committing discards it.
    async fn begin(&self, key: EdgeKey) -> RepoResult<Box<dyn EdgeTransaction>>;

    /// Open a consistent read view
    async fn snapshot(&self) -> RepoResult<Box<dyn EdgeSnapshot>>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> RepoResult<()>;
}

#[async_trait]
pub trait EdgeTransaction: Send {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>>;

    async fn insert_edge(&mut self, edge: &Edge) -> RepoResult<Edge>;

    async fn delete_edge(&mut self, key: &EdgeKey) -> RepoResult<bool>;

    /// Make every staged change visible at once
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

#[async_trait]
pub trait EdgeSnapshot: Send {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>>;

    async fn count_edges(&mut self, filter: &EdgeFilter) -> RepoResult<i64>;

    async fn list_edges(&mut self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>>;

    /// Release the read view
    async fn close(self: Box<Self>) -> RepoResult<()>;
}
