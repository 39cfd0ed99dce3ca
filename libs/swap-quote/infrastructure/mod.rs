//! Infrastructure Layer
//!
//! Implementations of external interfaces: configuration, logging and the
//! price API client.

pub mod client;
pub mod config;
pub mod logging;

pub use client::{PriceSource, QuoteError, ZeroExClient};
pub use config::{ApiConfig, ConfigError, PairConfig, QuoteFormConfig};
pub use logging::{init_file_tracing, init_tracing_with_level};
