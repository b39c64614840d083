//! Ports - interfaces the domain needs from infrastructure and collaborators

mod collaborators;
mod edge_store;

use crate::error::DomainError;

/// Result type for store and collaborator operations
pub type RepoResult<T> = Result<T, DomainError>;

pub use collaborators::{ChannelDirectory, ContentCatalog, ContentRegistry};
pub use edge_store::{EdgeSnapshot, EdgeStore, EdgeTransaction};
