//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use graph_common::{AppConfig, AppError, JwtService, StoreBackend};
use graph_core::traits::{ChannelDirectory, ContentCatalog, ContentRegistry, EdgeStore};
use graph_core::TargetType;
use graph_db::{
    create_pool, ensure_schema, MemoryChannelDirectory, MemoryContentCatalog, MemoryEdgeStore,
    PgChannelDirectory, PgContentCatalog, PgEdgeStore, PoolConfig,
};
use graph_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router().merge(health_routes());
    let router = apply_middleware_with_config(
        router,
        Duration::from_secs(config.api.request_timeout_secs),
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// The storage half of the service context
struct Backend {
    edge_store: Arc<dyn EdgeStore>,
    channels: Arc<dyn ChannelDirectory>,
    content: ContentRegistry,
}

async fn postgres_backend(config: &AppConfig) -> Result<Backend, AppError> {
    let pool_config = PoolConfig::from_app_config(&config.database)
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres store".into()))?;

    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&pool_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.bootstrap_schema {
        ensure_schema(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("Edge schema ensured");
    }

    let content = PgContentCatalog::all(&pool)
        .into_iter()
        .fold(ContentRegistry::new(), |registry, catalog| {
            registry.with(Arc::new(catalog))
        });

    Ok(Backend {
        edge_store: Arc::new(PgEdgeStore::new(pool.clone())),
        channels: Arc::new(PgChannelDirectory::new(pool)),
        content,
    })
}

/// In-memory directories start from `database.memory_seed`; refused outside development
fn memory_backend(config: &AppConfig) -> Result<Backend, AppError> {
    if !config.app.env.is_development() {
        return Err(AppError::Config(format!(
            "the in-memory edge store is not available in {:?}",
            config.app.env
        )));
    }
    warn!("Using the in-memory edge store; edges are lost on restart");

    let seed = &config.database.memory_seed;
    let catalogs = TargetType::ALL.map(|target_type| Arc::new(MemoryContentCatalog::new(target_type)));
    for item in &seed.content {
        if let Some(catalog) = catalogs
            .iter()
            .find(|catalog| catalog.target_type() == item.target.target_type)
        {
            catalog.add(item.target.id.clone(), item.owner.clone(), 0);
        }
    }
    info!(
        channels = seed.channels.len(),
        content = seed.content.len(),
        "Seeded in-memory directories"
    );

    let content = catalogs
        .into_iter()
        .fold(ContentRegistry::new(), |registry, catalog| {
            let catalog: Arc<dyn ContentCatalog> = catalog;
            registry.with(catalog)
        });

    Ok(Backend {
        edge_store: Arc::new(MemoryEdgeStore::new()),
        channels: Arc::new(MemoryChannelDirectory::with_channels(
            seed.channels.iter().cloned(),
        )),
        content,
    })
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let backend = match config.database.store {
        StoreBackend::Postgres => postgres_backend(&config).await?,
        StoreBackend::Memory => memory_backend(&config)?,
    };

    let service_context = ServiceContext::builder()
        .edge_store(backend.edge_store)
        .channels(backend.channels)
        .content(backend.content)
        .policy(config.edges)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    Ok(AppState::new(service_context, jwt_service, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
