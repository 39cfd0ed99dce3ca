//! Price quote request and response types for the 0x swap API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /swap/v1/price`
///
/// Only `buyAmount` is required. Everything else the API returns is optional
/// and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    /// Buy amount in the buy token's smallest unit
    pub buy_amount: String,

    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub sell_amount: Option<String>,

    #[serde(default)]
    pub estimated_gas: Option<String>,

    #[serde(default)]
    pub gas_price: Option<String>,

    #[serde(default)]
    pub buy_token_address: Option<String>,

    #[serde(default)]
    pub sell_token_address: Option<String>,
}

/// Parameters of a single price request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub taker_address: String,
    pub sell_token: String,
    pub buy_token: String,
    /// Sell amount in the sell token's smallest unit
    pub sell_amount: String,
}

impl PriceRequest {
    /// Flat key/value query mapping, URL-encoded by the HTTP client
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("takerAddress", self.taker_address.clone()),
            ("sellToken", self.sell_token.clone()),
            ("buyToken", self.buy_token.clone()),
            ("sellAmount", self.sell_amount.clone()),
        ]
    }
}

/// A resolved quote, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Sell amount that triggered the request, as typed
    pub sell_amount: String,
    /// Buy amount as a human decimal string
    pub buy_amount: String,
    /// Price reported by the API, if any
    pub price: Option<String>,
    /// Sequence number of the request that produced this quote
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
}
