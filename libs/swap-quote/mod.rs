//! Swap Quote
//!
//! Live sell/buy quoting for a single token pair: a debounced sell amount
//! drives price requests against the 0x API and the resolved buy amount is
//! published back to the form.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{spawn_quote_pipeline, Debouncer, FormApp, QuoteFetcher, QuoteForm};
pub use domain::{Amount, AmountField, PriceRequest, PriceResponse, Quote, QuoteStatus};
pub use infrastructure::{
    init_file_tracing, init_tracing_with_level, PairConfig, PriceSource,
    QuoteError, QuoteFormConfig, ZeroExClient,
};
pub use utils::ShutdownManager;
