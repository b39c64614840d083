//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, EdgePolicyConfig,
    Environment, JwtConfig, MemorySeed, SeedContent, ServerConfig, StoreBackend,
};
