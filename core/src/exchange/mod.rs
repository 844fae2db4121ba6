use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

use crate::types::{Quote, TradingPair};

pub mod bitget;
pub mod bybit;
pub mod okx;

/// A venue that can report its current top of book for a pair
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Venue identifier used in snapshots and fee lookups
    fn venue(&self) -> &str;

    /// Current best bid/ask and last price for a pair
    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote, ExchangeError>;
}

/// Exchange-related errors
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Invalid pair: {0}")]
    InvalidPair(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No symbol available on {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(e: reqwest::Error) -> Self {
        if e.status().map_or(false, |s| s.as_u16() == 429) {
            ExchangeError::RateLimit
        } else if e.is_decode() {
            ExchangeError::Parse(e.to_string())
        } else {
            ExchangeError::Connection(e.to_string())
        }
    }
}

/// Shared HTTP client with a request timeout
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}. Using defaults.", e);
            reqwest::Client::new()
        })
}

/// GET a JSON document, mapping HTTP failures to `ExchangeError`
pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, ExchangeError> {
    let resp = client.get(url).send().await?;
    if resp.status().as_u16() == 429 {
        return Err(ExchangeError::RateLimit);
    }
    let resp = resp.error_for_status()?;
    Ok(resp.json().await?)
}

/// Read a price that venues encode as a decimal string
pub(crate) fn price_field(item: &serde_json::Value, field: &str) -> Result<Decimal, ExchangeError> {
    let raw = item[field]
        .as_str()
        .ok_or_else(|| ExchangeError::Parse(format!("missing field {}", field)))?;
    raw.parse()
        .map_err(|e| ExchangeError::Parse(format!("{} = {:?}: {}", field, raw, e)))
}
