//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use graph_core::{ActorId, ContentId, Target, TargetType};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub edges: EdgePolicyConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which Edge Store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue("EDGE_STORE", other.to_string())),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub store: StoreBackend,
    /// Required when `store` is `postgres`
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Create the edge tables on startup if they do not exist
    #[serde(default)]
    pub bootstrap_schema: bool,
    /// Directory entries preloaded when `store` is `memory`
    #[serde(default)]
    pub memory_seed: MemorySeed,
}

/// Channels and content items the in-memory directories start with
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub channels: Vec<ActorId>,
    #[serde(default)]
    pub content: Vec<SeedContent>,
}

/// A content item and the channel that owns it, written `<type>:<id>:<owner>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedContent {
    pub target: Target,
    pub owner: ActorId,
}

impl FromStr for SeedContent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue("MEMORY_SEED_CONTENT", s.to_string());

        let mut parts = s.trim().splitn(3, ':');
        let (Some(target_type), Some(id), Some(owner)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let target_type: TargetType = target_type.parse().map_err(|_| invalid())?;
        Ok(Self {
            target: Target::new(target_type, ContentId::parse(id).map_err(|_| invalid())?),
            owner: ActorId::parse(owner).map_err(|_| invalid())?,
        })
    }
}

/// JWT configuration. Tokens are issued by the identity service; this
/// service only verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Rules applied by the toggle engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EdgePolicyConfig {
    #[serde(default = "default_true")]
    pub allow_self_subscription: bool,
    #[serde(default = "default_true")]
    pub allow_self_reaction: bool,
    /// Attempts per toggle before a conflict is reported as transient
    #[serde(default = "default_toggle_max_attempts")]
    pub toggle_max_attempts: u32,
}

impl Default for EdgePolicyConfig {
    fn default() -> Self {
        Self {
            allow_self_subscription: default_true(),
            allow_self_reaction: default_true(),
            toggle_max_attempts: default_toggle_max_attempts(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "graph-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_true() -> bool {
    true
}

fn default_toggle_max_attempts() -> u32 {
    3
}

/// Parse an optional variable, rejecting values that are present but malformed
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Parse a comma-separated variable; absent means empty
fn parse_list<T: FromStr>(name: &'static str) -> Result<Vec<T>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|_| ConfigError::InvalidValue(name, item.to_string()))
        })
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let app_env = env::var("APP_ENV")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "production" => Some(Environment::Production),
                "staging" => Some(Environment::Staging),
                "development" => Some(Environment::Development),
                _ => None,
            })
            .unwrap_or_default();

        let store: StoreBackend = parse_var("EDGE_STORE")?.unwrap_or_default();
        let url = env::var("DATABASE_URL").ok();
        if store == StoreBackend::Postgres && url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL"));
        }
        // Edges held in memory vanish on restart
        if store == StoreBackend::Memory && !app_env.is_development() {
            return Err(ConfigError::InvalidValue("EDGE_STORE", "memory".to_string()));
        }

        let toggle_max_attempts =
            parse_var("EDGES_TOGGLE_MAX_ATTEMPTS")?.unwrap_or_else(default_toggle_max_attempts);
        if toggle_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "EDGES_TOGGLE_MAX_ATTEMPTS",
                "0".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: app_env,
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
                request_timeout_secs: parse_var("API_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout),
            },
            database: DatabaseConfig {
                store,
                url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                bootstrap_schema: parse_var("DATABASE_BOOTSTRAP_SCHEMA")?.unwrap_or(false),
                memory_seed: MemorySeed {
                    channels: parse_list("MEMORY_SEED_CHANNELS")?,
                    content: parse_list("MEMORY_SEED_CONTENT")?,
                },
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            edges: EdgePolicyConfig {
                allow_self_subscription: parse_var("EDGES_ALLOW_SELF_SUBSCRIPTION")?
                    .unwrap_or_else(default_true),
                allow_self_reaction: parse_var("EDGES_ALLOW_SELF_REACTION")?
                    .unwrap_or_else(default_true),
                toggle_max_attempts,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
