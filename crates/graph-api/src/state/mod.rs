//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the identity verifier for bearer tokens, and configuration.

use std::sync::Arc;

use graph_common::{AppConfig, IdentityVerifier};
use graph_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Verifies bearer tokens issued by the identity service
    identity: Arc<dyn IdentityVerifier>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        identity: Arc<dyn IdentityVerifier>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            identity,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the identity verifier
    pub fn identity(&self) -> &dyn IdentityVerifier {
        self.identity.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("identity", &"IdentityVerifier")
            .field("config", &"AppConfig")
            .finish()
    }
}
