//! In-memory implementation of EdgeStore
//!
//! The current edge tables live behind an `Arc` swapped under a short
//! `parking_lot` write lock. Snapshots clone the `Arc`, so they never observe
//! a later write and never block writers.
//!
//! Mutations on one natural key are serialized by an async per-key lock held
//! for the whole transaction. Transactions stage their changes and apply them
//! in a single critical section at commit.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use graph_core::entities::{Edge, EdgeFilter, EdgeKey, EdgePage};
use graph_core::error::DomainError;
use graph_core::traits::{EdgeSnapshot, EdgeStore, EdgeTransaction, RepoResult};

use super::tables::EdgeTables;

struct Shared {
    tables: RwLock<Arc<EdgeTables>>,
    key_locks: DashMap<EdgeKey, Arc<Mutex<()>>>,
}

impl Shared {
    fn current(&self) -> Arc<EdgeTables> {
        Arc::clone(&self.tables.read())
    }

    /// Apply a change to the current tables. While any snapshot still holds
    /// the current version, `make_mut` copies every table first, so a write
    /// under concurrent reads costs O(edges). Acceptable for a store that
    /// only backs tests and local runs.
    fn write<R>(&self, f: impl FnOnce(&mut EdgeTables) -> R) -> R {
        let mut tables = self.tables.write();
        f(Arc::make_mut(&mut tables))
    }

    async fn lock_key(self: &Arc<Self>, key: EdgeKey) -> KeyLock {
        let mutex = Arc::clone(&self.key_locks.entry(key.clone()).or_default());
        let guard = mutex.lock_owned().await;

        KeyLock {
            shared: Arc::clone(self),
            key,
            guard: Some(guard),
        }
    }
}

/// Held for the lifetime of a transaction; releases and garbage-collects the
/// per-key mutex on drop
struct KeyLock {
    shared: Arc<Shared>,
    key: EdgeKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map holds it now, so nobody is waiting
        self.shared
            .key_locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// In-memory implementation of EdgeStore
#[derive(Clone)]
pub struct MemoryEdgeStore {
    shared: Arc<Shared>,
}

impl MemoryEdgeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: RwLock::new(Arc::new(EdgeTables::default())),
                key_locks: DashMap::new(),
            }),
        }
    }
}

impl Default for MemoryEdgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryEdgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEdgeStore")
            .field("locked_keys", &self.shared.key_locks.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EdgeStore for MemoryEdgeStore {
    #[instrument(skip(self))]
    async fn find_edge(&self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        Ok(self.shared.current().get(key))
    }

    #[instrument(skip(self))]
    async fn insert_edge(&self, edge: &Edge) -> RepoResult<Edge> {
        let key = edge.key();
        let _lock = self.shared.lock_key(key.clone()).await;

        self.shared.write(|tables| {
            if tables.contains(&key) {
                return Err(DomainError::EdgeConflict);
            }
            tables.put(edge.clone());
            Ok(edge.clone())
        })
    }

    #[instrument(skip(self))]
    async fn delete_edge(&self, key: &EdgeKey) -> RepoResult<bool> {
        let _lock = self.shared.lock_key(key.clone()).await;
        Ok(self.shared.write(|tables| tables.remove(key)).is_some())
    }

    #[instrument(skip(self))]
    async fn count_edges(&self, filter: &EdgeFilter) -> RepoResult<i64> {
        Ok(self.shared.current().count(filter))
    }

    #[instrument(skip(self))]
    async fn list_edges(&self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>> {
        Ok(self.shared.current().list(filter, &page))
    }

    #[instrument(skip(self))]
    async fn begin(&self, key: EdgeKey) -> RepoResult<Box<dyn EdgeTransaction>> {
        let lock = self.shared.lock_key(key).await;
        let base = self.shared.current().get(&lock.key);
        debug!(existing = base.is_some(), "Edge transaction opened");

        Ok(Box::new(MemoryEdgeTransaction {
            view: base.clone(),
            base,
            dirty: false,
            lock,
        }))
    }

    #[instrument(skip(self))]
    async fn snapshot(&self) -> RepoResult<Box<dyn EdgeSnapshot>> {
        Ok(Box::new(MemoryEdgeSnapshot {
            tables: self.shared.current(),
        }))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// Unit of work on a single key. Dropping it discards the staged change and
/// releases the key.
pub struct MemoryEdgeTransaction {
    /// Committed edge when the transaction opened
    base: Option<Edge>,
    /// Edge as this transaction currently sees it
    view: Option<Edge>,
    dirty: bool,
    lock: KeyLock,
}

impl MemoryEdgeTransaction {
    fn check_scope(&self, key: &EdgeKey) -> RepoResult<()> {
        if *key == self.lock.key {
            Ok(())
        } else {
            Err(DomainError::InternalError(format!(
                "transaction on {:?} cannot touch {key:?}",
                self.lock.key
            )))
        }
    }
}

#[async_trait]
impl EdgeTransaction for MemoryEdgeTransaction {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        self.check_scope(key)?;
        Ok(self.view.clone())
    }

    async fn insert_edge(&mut self, edge: &Edge) -> RepoResult<Edge> {
        self.check_scope(&edge.key())?;
        if self.view.is_some() {
            return Err(DomainError::EdgeConflict);
        }
        self.view = Some(edge.clone());
        self.dirty = true;
        Ok(edge.clone())
    }

    async fn delete_edge(&mut self, key: &EdgeKey) -> RepoResult<bool> {
        self.check_scope(key)?;
        let removed = self.view.take().is_some();
        self.dirty |= removed;
        Ok(removed)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        if !self.dirty {
            return Ok(());
        }

        let Self {
            base, view, lock, ..
        } = *self;
        let key = &lock.key;

        // Key lock is released after the write, when `lock` drops
        lock.shared.write(|tables| {
            if tables.get(key) != base {
                return Err(DomainError::EdgeConflict);
            }
            tables.remove(key);
            if let Some(edge) = view {
                tables.put(edge);
            }
            Ok(())
        })
    }
}

/// Read view pinned to one version of the tables
pub struct MemoryEdgeSnapshot {
    tables: Arc<EdgeTables>,
}

#[async_trait]
impl EdgeSnapshot for MemoryEdgeSnapshot {
    async fn find_edge(&mut self, key: &EdgeKey) -> RepoResult<Option<Edge>> {
        Ok(self.tables.get(key))
    }

    async fn count_edges(&mut self, filter: &EdgeFilter) -> RepoResult<i64> {
        Ok(self.tables.count(filter))
    }

    async fn list_edges(&mut self, filter: &EdgeFilter, page: EdgePage) -> RepoResult<Vec<Edge>> {
        Ok(self.tables.list(filter, &page))
    }

    async fn close(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}
