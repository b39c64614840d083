//! Business logic services
//!
//! Writes go through [`ToggleService`]; reads go through
//! [`AggregationService`] and [`ListingService`]. None of them call each
//! other, they only share the [`ServiceContext`].

pub mod aggregation;
pub mod context;
pub mod error;
pub mod listing;
pub mod toggle;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregation::AggregationService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use listing::{EdgeListing, ListingService};
pub use toggle::ToggleService;
