use async_trait::async_trait;
use std::time::Duration;

use crate::exchange::{get_json, http_client, price_field, ExchangeError, QuoteSource};
use crate::types::*;

const BYBIT_REST_URL: &str = "https://api.bybit.com";

pub struct BybitConnector {
    client: reqwest::Client,
}

impl BybitConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

/// Parse a Bybit V5 `/market/tickers` response
fn parse_ticker(data: &serde_json::Value, pair: &TradingPair) -> Result<Quote, ExchangeError> {
    let ret_code = data["retCode"].as_i64().unwrap_or(-1);
    if ret_code != 0 {
        return Err(ExchangeError::Api(format!(
            "Bybit retCode {}: {}",
            ret_code,
            data["retMsg"].as_str().unwrap_or("unknown")
        )));
    }

    let item = data["result"]["list"]
        .get(0)
        .ok_or_else(|| ExchangeError::InvalidPair(pair.to_string()))?;

    Ok(Quote::new(
        "bybit",
        pair.to_string(),
        price_field(item, "bid1Price")?,
        price_field(item, "ask1Price")?,
        price_field(item, "lastPrice")?,
    ))
}

#[async_trait]
impl QuoteSource for BybitConnector {
    fn venue(&self) -> &str {
        "bybit"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote, ExchangeError> {
        let url = format!(
            "{}/v5/market/tickers?category=spot&symbol={}",
            BYBIT_REST_URL,
            pair.concatenated()
        );
        let data = get_json(&self.client, &url).await?;
        parse_ticker(&data, pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_spot_ticker() {
        let data = serde_json::json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "spot",
                "list": [{
                    "symbol": "XRPUSDT",
                    "bid1Price": "0.5231",
                    "ask1Price": "0.5232",
                    "lastPrice": "0.5231"
                }]
            }
        });
        let quote = parse_ticker(&data, &TradingPair::new("XRP", "USDT")).unwrap();
        assert_eq!(quote.venue, "bybit");
        assert_eq!(quote.symbol, "XRP/USDT");
        assert_eq!(quote.bid, dec!(0.5231));
        assert_eq!(quote.ask, dec!(0.5232));
    }

    #[test]
    fn api_error_and_unknown_symbol() {
        let pair = TradingPair::new("XRP", "USD");
        let err = serde_json::json!({ "retCode": 10001, "retMsg": "params error" });
        assert!(matches!(parse_ticker(&err, &pair), Err(ExchangeError::Api(_))));

        let empty = serde_json::json!({ "retCode": 0, "result": { "list": [] } });
        assert!(matches!(parse_ticker(&empty, &pair), Err(ExchangeError::InvalidPair(_))));
    }
}
