use async_trait::async_trait;
use std::time::Duration;

use crate::exchange::{get_json, http_client, price_field, ExchangeError, QuoteSource};
use crate::types::*;

const BITGET_REST_URL: &str = "https://api.bitget.com";

pub struct BitgetConnector {
    client: reqwest::Client,
}

impl BitgetConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

/// Parse a Bitget V2 spot tickers response
fn parse_ticker(data: &serde_json::Value, pair: &TradingPair) -> Result<Quote, ExchangeError> {
    let code = data["code"].as_str().unwrap_or("");
    if code != "00000" {
        return Err(ExchangeError::Api(format!(
            "Bitget code {}: {}",
            code,
            data["msg"].as_str().unwrap_or("unknown")
        )));
    }

    let item = data["data"]
        .get(0)
        .ok_or_else(|| ExchangeError::InvalidPair(pair.to_string()))?;

    Ok(Quote::new(
        "bitget",
        pair.to_string(),
        price_field(item, "bidPr")?,
        price_field(item, "askPr")?,
        price_field(item, "lastPr")?,
    ))
}

#[async_trait]
impl QuoteSource for BitgetConnector {
    fn venue(&self) -> &str {
        "bitget"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote, ExchangeError> {
        let url = format!(
            "{}/api/v2/spot/market/tickers?symbol={}",
            BITGET_REST_URL,
            pair.concatenated()
        );
        let data = get_json(&self.client, &url).await?;
        parse_ticker(&data, pair)
    }
}
