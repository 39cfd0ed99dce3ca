//! External API clients

pub mod zerox;

pub use zerox::{PriceSource, QuoteError, ZeroExClient};
