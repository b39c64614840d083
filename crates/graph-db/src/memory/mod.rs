//! In-memory Edge Store and collaborator directories
//!
//! Used by the test suites and by local runs with `EDGE_STORE=memory`.

mod directory;
mod edge_store;
mod tables;

pub use directory::{MemoryChannelDirectory, MemoryContentCatalog};
pub use edge_store::{MemoryEdgeSnapshot, MemoryEdgeStore, MemoryEdgeTransaction};
