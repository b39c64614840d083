//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod channels;
pub mod health;
pub mod reactions;
pub mod subscriptions;
pub mod users;
