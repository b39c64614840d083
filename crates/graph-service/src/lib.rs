//! # graph-service
//!
//! Application layer: the toggle engine that mutates edges, the aggregation
//! engine that reads them into view models, and the DTOs both are served as.

pub mod dto;
pub mod services;

pub use services::{
    AggregationService, EdgeListing, ListingService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, ToggleService,
};
