//! # graph-common
//!
//! Shared utilities including configuration, error handling, identity
//! verification, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, IdentityVerifier, JwtService, TokenType};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, EdgePolicyConfig,
    Environment, JwtConfig, MemorySeed, SeedContent, ServerConfig, StoreBackend,
};
pub use error::AppError;
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
