use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{AmountError, PriceRequest, PriceResponse};
use crate::infrastructure::config::constants::{API_KEY_HEADER, PRICE_PATH};
use crate::infrastructure::config::ApiConfig;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Anything that can price a sell amount
#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
    async fn get_price(&self, request: &PriceRequest) -> Result<PriceResponse>;
}

/// 0x swap API client
pub struct ZeroExClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl ZeroExClient {
    /// Create new 0x API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            client: Client::new(),
        }
    }

    /// Create a client from configuration, with a per-request timeout
    pub fn from_config(config: &ApiConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn price_url(&self) -> String {
        format!("{}{}", self.base_url, PRICE_PATH)
    }

    /// Fetch an indicative price for the request
    pub async fn get_price(&self, request: &PriceRequest) -> Result<PriceResponse> {
        let url = self.price_url();
        let params = request.to_query_params();

        debug!("GET {} with params {:?}", url, params);

        let mut builder = self.client.get(&url).query(&params);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;

        let status = response.status();

        if status == 429 {
            warn!("Rate limit exceeded");
            return Err(QuoteError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QuoteError::ApiError(format!(
                "Failed to fetch price ({}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let price: PriceResponse = serde_json::from_str(&body)
            .map_err(|e| QuoteError::DeserializeFailed(e.to_string()))?;

        Ok(price)
    }
}

#[async_trait]
impl PriceSource for ZeroExClient {
    async fn get_price(&self, request: &PriceRequest) -> Result<PriceResponse> {
        ZeroExClient::get_price(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zerox_client_creation() {
        let client = ZeroExClient::new("https://api.0x.org/");
        assert_eq!(client.base_url, "https://api.0x.org");
        assert_eq!(client.price_url(), "https://api.0x.org/swap/v1/price");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_client_from_config() {
        let config = ApiConfig::default();
        let client = ZeroExClient::from_config(&config, Some("secret".to_string())).unwrap();
        assert_eq!(client.price_url(), "https://api.0x.org/swap/v1/price");
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }
}
