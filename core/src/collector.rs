use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_SYMBOLS};
use crate::exchange::bitget::BitgetConnector;
use crate::exchange::bybit::BybitConnector;
use crate::exchange::okx::OkxConnector;
use crate::exchange::{ExchangeError, QuoteSource};
use crate::types::{Quote, QuoteSnapshot, TradingPair};

/// Polls venues one after another and assembles a snapshot
pub struct QuoteCollector {
    sources: Vec<Arc<dyn QuoteSource>>,
    /// Symbols to try per venue, in order of preference
    symbols: HashMap<String, Vec<TradingPair>>,
    inter_venue_delay: Duration,
}

impl QuoteCollector {
    pub fn new(
        sources: Vec<Arc<dyn QuoteSource>>,
        symbols: HashMap<String, Vec<TradingPair>>,
        inter_venue_delay: Duration,
    ) -> Self {
        Self {
            sources,
            symbols,
            inter_venue_delay,
        }
    }

    /// Collector over the enabled venues of `config` that have a connector.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_millis(config.engine.request_timeout_ms);
        let mut sources: Vec<Arc<dyn QuoteSource>> = Vec::new();
        let mut symbols = HashMap::new();

        for (name, venue) in config.enabled_venues() {
            let source: Arc<dyn QuoteSource> = match name.as_str() {
                "bybit" => Arc::new(BybitConnector::new(timeout)),
                "bitget" => Arc::new(BitgetConnector::new(timeout)),
                "okx" => Arc::new(OkxConnector::new(timeout)),
                other => {
                    warn!("No connector for venue {}, skipping", other);
                    continue;
                }
            };

            let pairs = venue
                .symbols_or_default()
                .iter()
                .filter_map(|s| match s.parse::<TradingPair>() {
                    Ok(pair) => Some(pair),
                    Err(e) => {
                        warn!("Ignoring symbol for {}: {}", name, e);
                        None
                    }
                })
                .collect();

            info!("{} connector enabled | fee_rate={}", name, venue.fee_rate);
            symbols.insert(name.clone(), pairs);
            sources.push(source);
        }

        Self::new(
            sources,
            symbols,
            Duration::from_millis(config.engine.inter_venue_delay_ms),
        )
    }

    pub fn venues(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.venue()).collect()
    }

    fn symbols_for(&self, venue: &str) -> Vec<TradingPair> {
        match self.symbols.get(venue) {
            Some(pairs) if !pairs.is_empty() => pairs.clone(),
            _ => DEFAULT_SYMBOLS
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect(),
        }
    }

    /// Try each symbol for one venue until one works.
    pub async fn fetch_venue(&self, source: &dyn QuoteSource) -> Result<Quote, ExchangeError> {
        let venue = source.venue();
        for pair in self.symbols_for(venue) {
            match source.fetch_quote(&pair).await {
                Ok(quote) => return Ok(quote),
                Err(e) => warn!("Failed to fetch {} from {}: {}", pair, venue, e),
            }
        }
        Err(ExchangeError::Unavailable(venue.to_string()))
    }

    /// One collection cycle. Venues that fail or report bad data are left out.
    pub async fn collect(&self) -> QuoteSnapshot {
        let mut snapshot = QuoteSnapshot::empty();

        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 && !self.inter_venue_delay.is_zero() {
                tokio::time::sleep(self.inter_venue_delay).await;
            }

            let venue = source.venue();
            debug!("Checking {}...", venue);
            match self.fetch_venue(source.as_ref()).await {
                Ok(quote) => {
                    let last = quote.last;
                    let symbol = quote.symbol.clone();
                    match snapshot.push(quote) {
                        Ok(()) => info!("{}: {} @ {}", venue, symbol, last),
                        Err(e) => warn!("Dropping quote: {}", e),
                    }
                }
                Err(e) => warn!("Skipping venue: {}", e),
            }
        }

        info!(
            "Collected {}/{} venues",
            snapshot.len(),
            self.sources.len()
        );
        snapshot
    }
}
