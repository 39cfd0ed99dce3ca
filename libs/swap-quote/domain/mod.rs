//! Domain Layer
//!
//! Pure types with no I/O: amounts, quotes and fetcher status.

pub mod amount;
pub mod quote;
pub mod status;

pub use amount::{format_base_units, is_valid_amount_input, Amount, AmountError, AmountField};
pub use quote::{PriceRequest, PriceResponse, Quote};
pub use status::QuoteStatus;
