//! In-memory collaborator directories for local runs and tests

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use graph_core::entities::OwnedContent;
use graph_core::traits::{ChannelDirectory, ContentCatalog, RepoResult};
use graph_core::value_objects::{ActorId, ContentId, TargetType};

/// Set of known channels
#[derive(Debug, Default)]
pub struct MemoryChannelDirectory {
    channels: RwLock<HashSet<ActorId>>,
}

impl MemoryChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channels(channels: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            channels: RwLock::new(channels.into_iter().collect()),
        }
    }

    pub fn add_channel(&self, channel: ActorId) {
        self.channels.write().insert(channel);
    }

    pub fn remove_channel(&self, channel: &ActorId) -> bool {
        self.channels.write().remove(channel)
    }
}

#[async_trait]
impl ChannelDirectory for MemoryChannelDirectory {
    async fn channel_exists(&self, channel: &ActorId) -> RepoResult<bool> {
        Ok(self.channels.read().contains(channel))
    }
}

#[derive(Debug, Clone)]
struct ContentRecord {
    owner: ActorId,
    views: i64,
}

/// Content items of one target type, keyed by id
#[derive(Debug)]
pub struct MemoryContentCatalog {
    target_type: TargetType,
    items: RwLock<BTreeMap<ContentId, ContentRecord>>,
}

impl MemoryContentCatalog {
    pub fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add or replace a content item
    pub fn add(&self, id: impl Into<ContentId>, owner: ActorId, views: i64) {
        self.items
            .write()
            .insert(id.into(), ContentRecord { owner, views });
    }

    /// Update a view counter; `false` if the item is unknown
    pub fn set_views(&self, id: impl Into<ContentId>, views: i64) -> bool {
        match self.items.write().get_mut(&id.into()) {
            Some(record) => {
                record.views = views;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: impl Into<ContentId>) -> bool {
        self.items.write().remove(&id.into()).is_some()
    }
}

#[async_trait]
impl ContentCatalog for MemoryContentCatalog {
    fn target_type(&self) -> TargetType {
        self.target_type
    }

    async fn owner_of(&self, id: &ContentId) -> RepoResult<Option<ActorId>> {
        Ok(self.items.read().get(id).map(|record| record.owner.clone()))
    }

    async fn list_by_owner(&self, owner: &ActorId) -> RepoResult<Vec<OwnedContent>> {
        Ok(self
            .items
            .read()
            .iter()
            .filter(|(_, record)| record.owner == *owner)
            .map(|(id, record)| OwnedContent::new(id.clone(), record.views))
            .collect())
    }
}
