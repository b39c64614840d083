//! Axum extractors for request handling
//!
//! Custom extractors for authentication, pagination, and typed path segments.

mod auth;
mod pagination;
mod path;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::{Pagination, PaginationParams, TargetTypeFilter};
pub use path::{ChannelIdPath, KindPath, TargetKindPath, TargetPath};
