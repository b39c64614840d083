//! Repository implementations
//!
//! PostgreSQL implementations of the Edge Store and collaborator traits
//! defined in graph-core.

mod content;
mod edge_store;
mod error;
mod queries;

pub use content::{PgChannelDirectory, PgContentCatalog};
pub use edge_store::{PgEdgeSnapshot, PgEdgeStore, PgEdgeTransaction};
