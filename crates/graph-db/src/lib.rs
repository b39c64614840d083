//! # graph-db
//!
//! Storage layer implementing the Edge Store and collaborator traits.
//!
//! ## Overview
//!
//! - PostgreSQL via SQLx: connection pool, schema bootstrap, `FromRow`
//!   models and mappers, [`PgEdgeStore`], and read-only directories over the
//!   identity and content services' tables
//! - In-memory: [`MemoryEdgeStore`] with copy-on-write snapshots, plus
//!   directories that tests and local runs seed by hand
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graph_db::{create_pool, ensure_schema, PgEdgeStore, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/graph")).await?;
//!     ensure_schema(&pool).await?;
//!     let store = PgEdgeStore::new(pool);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::{MemoryChannelDirectory, MemoryContentCatalog, MemoryEdgeStore};
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{PgChannelDirectory, PgContentCatalog, PgEdgeStore};
pub use schema::ensure_schema;
