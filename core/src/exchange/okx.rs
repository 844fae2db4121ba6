use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::exchange::{get_json, http_client, price_field, ExchangeError, QuoteSource};
use crate::types::*;

const OKX_REST_URL: &str = "https://www.okx.com";

pub struct OkxConnector {
    client: reqwest::Client,
}

impl OkxConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OkxResponse {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Parse an OKX V5 `/market/ticker` response
fn parse_ticker(data: serde_json::Value, pair: &TradingPair) -> Result<Quote, ExchangeError> {
    let resp: OkxResponse =
        serde_json::from_value(data).map_err(|e| ExchangeError::Parse(e.to_string()))?;

    if resp.code != "0" {
        // 51001: instrument does not exist
        return Err(if resp.code == "51001" {
            ExchangeError::InvalidPair(pair.to_string())
        } else {
            ExchangeError::Api(format!("OKX code {}: {}", resp.code, resp.msg))
        });
    }

    let item = resp
        .data
        .first()
        .ok_or_else(|| ExchangeError::InvalidPair(pair.to_string()))?;

    Ok(Quote::new(
        "okx",
        pair.to_string(),
        price_field(item, "bidPx")?,
        price_field(item, "askPx")?,
        price_field(item, "last")?,
    ))
}

#[async_trait]
impl QuoteSource for OkxConnector {
    fn venue(&self) -> &str {
        "okx"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote, ExchangeError> {
        let url = format!(
            "{}/api/v5/market/ticker?instId={}",
            OKX_REST_URL,
            pair.dashed()
        );
        let data = get_json(&self.client, &url).await?;
        parse_ticker(data, pair)
    }
}
