//! Telemetry and tracing setup

mod subscriber;

pub use subscriber::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
