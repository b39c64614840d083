//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use graph_api::{create_app, create_app_state, AppState};
use graph_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, EdgePolicyConfig, Environment, JwtConfig,
    JwtService, ServerConfig, StoreBackend,
};
use graph_db::MemoryEdgeStore;
use graph_service::ServiceContext;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{World, TEST_JWT_SECRET};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over a fresh in-memory store and the seeded world
    pub async fn start() -> Result<Self> {
        Self::start_with_policy(EdgePolicyConfig::default()).await
    }

    /// Same as [`TestServer::start`] with custom edge rules
    pub async fn start_with_policy(policy: EdgePolicyConfig) -> Result<Self> {
        let world = World::seeded();
        let ctx = ServiceContext::builder()
            .edge_store(Arc::new(MemoryEdgeStore::new()))
            .channels(world.channels.clone())
            .content(world.content())
            .policy(policy)
            .build()?;

        let mut config = memory_config();
        config.edges = policy;
        let identity = Arc::new(JwtService::new(TEST_JWT_SECRET, config.jwt.access_token_expiry));

        Self::serve(create_app(AppState::new(ctx, identity, config))).await
    }

    /// Start a server wired from configuration, as the binary does
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        Self::serve(create_app(state)).await
    }

    async fn serve(app: Router) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    /// GET a root path such as `/health`
    pub async fn get_root(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET an API path without credentials
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.api_url(path)).send().await?)
    }

    /// GET an API path with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// POST an API path without credentials or body
    pub async fn post(&self, path: &str) -> Result<Response> {
        Ok(self.client.post(self.api_url(path)).send().await?)
    }

    /// POST an API path with auth token and no body
    pub async fn post_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

/// Configuration for an in-memory server
pub fn memory_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "graph-server-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 10,
        },
        database: DatabaseConfig {
            store: StoreBackend::Memory,
            url: None,
            max_connections: 1,
            min_connections: 1,
            bootstrap_schema: false,
            memory_seed: Default::default(),
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 900,
        },
        cors: CorsConfig::default(),
        edges: EdgePolicyConfig::default(),
    }
}

/// Configuration for a PostgreSQL-backed server, if DATABASE_URL is set
pub fn postgres_config() -> Option<AppConfig> {
    dotenvy::dotenv().ok();

    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return None;
    };

    let mut config = memory_config();
    config.database = DatabaseConfig {
        store: StoreBackend::Postgres,
        url: Some(url),
        max_connections: 5,
        min_connections: 1,
        bootstrap_schema: true,
        memory_seed: Default::default(),
    };
    Some(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
