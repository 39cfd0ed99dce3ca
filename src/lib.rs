//! Swap Quote Form - Main Library
//!
//! Re-exports the `swap_quote` workspace library and carries the shared
//! helpers for the binaries.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (config path resolution)
//! - **swap_quote**: Debounced quote pipeline, 0x client and terminal form
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use swap_quote_form::bin_common::{load_config_from_env, ConfigType};
//! use swap_quote_form::swap_quote::QuoteFormConfig;
//! ```

// Re-export workspace libraries for convenience
pub use swap_quote;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config, load_config_from_env, ConfigType};
}
