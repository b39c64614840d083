//! Service context - dependency container for services
//!
//! Holds the edge store, the collaborator directories, and the edge policy.

use std::sync::Arc;

use graph_common::EdgePolicyConfig;
use graph_core::traits::{ChannelDirectory, ContentRegistry, EdgeStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    edge_store: Arc<dyn EdgeStore>,
    channels: Arc<dyn ChannelDirectory>,
    content: ContentRegistry,
    policy: EdgePolicyConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        edge_store: Arc<dyn EdgeStore>,
        channels: Arc<dyn ChannelDirectory>,
        content: ContentRegistry,
        policy: EdgePolicyConfig,
    ) -> Self {
        Self {
            edge_store,
            channels,
            content,
            policy,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the edge store
    pub fn edge_store(&self) -> &dyn EdgeStore {
        self.edge_store.as_ref()
    }

    /// Get the channel directory
    pub fn channels(&self) -> &dyn ChannelDirectory {
        self.channels.as_ref()
    }

    /// Get the content catalogs, keyed by target type
    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    /// Get the self-edge and retry policy
    pub fn policy(&self) -> &EdgePolicyConfig {
        &self.policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("edge_store", &"EdgeStore")
            .field("channels", &"ChannelDirectory")
            .field("content", &self.content)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    edge_store: Option<Arc<dyn EdgeStore>>,
    channels: Option<Arc<dyn ChannelDirectory>>,
    content: ContentRegistry,
    policy: EdgePolicyConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge_store(mut self, store: Arc<dyn EdgeStore>) -> Self {
        self.edge_store = Some(store);
        self
    }

    pub fn channels(mut self, directory: Arc<dyn ChannelDirectory>) -> Self {
        self.channels = Some(directory);
        self
    }

    pub fn content(mut self, content: ContentRegistry) -> Self {
        self.content = content;
        self
    }

    pub fn policy(mut self, policy: EdgePolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a dependency is missing, a
    /// target type has no content catalog, or the retry bound is zero
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let edge_store = self
            .edge_store
            .ok_or_else(|| ServiceError::validation("edge_store is required"))?;
        let channels = self
            .channels
            .ok_or_else(|| ServiceError::validation("channels is required"))?;

        let missing = self.content.missing();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|t| t.as_str()).collect();
            return Err(ServiceError::validation(format!(
                "no content catalog for: {}",
                names.join(", ")
            )));
        }

        if self.policy.toggle_max_attempts == 0 {
            return Err(ServiceError::validation(
                "toggle_max_attempts must be at least 1",
            ));
        }

        Ok(ServiceContext::new(
            edge_store,
            channels,
            self.content,
            self.policy,
        ))
    }
}
