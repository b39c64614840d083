//! Integration test utilities for the graph server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API, backed either by a seeded in-memory store or by PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
