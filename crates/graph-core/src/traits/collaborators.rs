//! Collaborator ports - content and channel lookups owned by other services

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::OwnedContent;
use crate::error::DomainError;
use crate::value_objects::{ActorId, ContentId, Target, TargetType};

/// Content service view of one target type
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// The target type this catalog answers for
    fn target_type(&self) -> TargetType;

    /// Owner of a content item, or `None` if it does not exist
    async fn owner_of(&self, id: &ContentId) -> RepoResult<Option<ActorId>>;

    /// Content items owned by a channel, with their view counters
    async fn list_by_owner(&self, owner: &ActorId) -> RepoResult<Vec<OwnedContent>>;
}

/// Identity service view of channels (every account is a channel)
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn channel_exists(&self, channel: &ActorId) -> RepoResult<bool>;
}

/// Lookup table from target type to the catalog that validates it
#[derive(Clone, Default)]
pub struct ContentRegistry {
    catalogs: HashMap<TargetType, Arc<dyn ContentCatalog>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog under its own target type, replacing any previous one
    pub fn with(mut self, catalog: Arc<dyn ContentCatalog>) -> Self {
        self.catalogs.insert(catalog.target_type(), catalog);
        self
    }

    pub fn get(&self, target_type: TargetType) -> Option<&Arc<dyn ContentCatalog>> {
        self.catalogs.get(&target_type)
    }

    /// Catalog for a target type; a missing one is a wiring error
    pub fn catalog(&self, target_type: TargetType) -> RepoResult<&Arc<dyn ContentCatalog>> {
        self.get(target_type).ok_or_else(|| {
            DomainError::InternalError(format!("no content catalog registered for {target_type}"))
        })
    }

    /// Owner of a target, or `None` if it does not exist
    pub async fn owner_of(&self, target: &Target) -> RepoResult<Option<ActorId>> {
        self.catalog(target.target_type)?.owner_of(&target.id).await
    }

    /// Target types with no registered catalog
    pub fn missing(&self) -> Vec<TargetType> {
        TargetType::ALL
            .into_iter()
            .filter(|t| !self.catalogs.contains_key(t))
            .collect()
    }
}

impl fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.catalogs.keys().collect();
        types.sort();
        f.debug_struct("ContentRegistry")
            .field("catalogs", &types)
            .finish()
    }
}
