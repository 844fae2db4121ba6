use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::SnapshotError;

/// Trading pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,  // e.g. "XRP"
    pub quote: String, // e.g. "USDT"
}

impl TradingPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }

    /// Symbol without separator, e.g. XRPUSDT
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// Symbol joined with a dash, e.g. XRP-USDT
    pub fn dashed(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((base, quote)) if !base.trim().is_empty() && !quote.trim().is_empty() => {
                Ok(TradingPair::new(base.trim(), quote.trim()))
            }
            _ => Err(format!("expected BASE/QUOTE, got {:?}", s)),
        }
    }
}

/// One venue's observed market state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub venue: String,
    pub symbol: String,
    pub bid: Decimal,  // Best bid price
    pub ask: Decimal,  // Best ask price
    pub last: Decimal, // Last traded price
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        venue: impl Into<String>,
        symbol: impl Into<String>,
        bid: Decimal,
        ask: Decimal,
        last: Decimal,
    ) -> Self {
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
            bid,
            ask,
            last,
            observed_at: Utc::now(),
        }
    }

    /// Rejects non-positive prices and crossed books.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let invalid = |reason: String| SnapshotError::InvalidQuote {
            venue: self.venue.clone(),
            reason,
        };

        if self.venue.trim().is_empty() {
            return Err(invalid("empty venue identifier".to_string()));
        }
        for (name, value) in [("bid", self.bid), ("ask", self.ask), ("last", self.last)] {
            if value <= Decimal::ZERO {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.ask < self.bid {
            return Err(invalid(format!(
                "crossed book: ask {} below bid {}",
                self.ask, self.bid
            )));
        }
        Ok(())
    }
}

/// Validated quotes for a single analysis run, at most one per venue
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteSnapshot {
    quotes: Vec<Quote>,
}

impl QuoteSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(quotes: Vec<Quote>) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::with_capacity(quotes.len());
        for quote in quotes {
            snapshot.push(quote)?;
        }
        Ok(snapshot)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            quotes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a quote, keeping insertion order.
    pub fn push(&mut self, quote: Quote) -> Result<(), SnapshotError> {
        quote.validate()?;
        if self.get(&quote.venue).is_some() {
            return Err(SnapshotError::DuplicateVenue(quote.venue));
        }
        self.quotes.push(quote);
        Ok(())
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn get(&self, venue: &str) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.venue.eq_ignore_ascii_case(venue))
    }

    pub fn venues(&self) -> Vec<&str> {
        self.quotes.iter().map(|q| q.venue.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// A fee-adjusted arbitrage opportunity for one directed venue pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_symbol: String,
    pub sell_symbol: String,
    pub buy_price: Decimal,  // Ask on buy venue
    pub sell_price: Decimal, // Bid on sell venue
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
    pub buy_cost_with_fees: Decimal,
    pub sell_revenue_with_fees: Decimal,
    pub profit_per_unit: Decimal,
    pub profit_pct: Decimal,
}

impl Opportunity {
    /// Profit in quote currency when trading `volume` units, saturating at
    /// the `Decimal` bounds
    pub fn projected_profit(&self, volume: Decimal) -> Decimal {
        self.profit_per_unit.saturating_mul(volume)
    }

    pub fn projections(&self, volumes: &[Decimal]) -> Vec<ProjectedProfit> {
        volumes
            .iter()
            .map(|&volume| ProjectedProfit {
                volume,
                profit: self.projected_profit(volume),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedProfit {
    pub volume: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenuePrice {
    pub venue: String,
    pub price: Decimal,
}

/// Min/max last price across a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub lowest: VenuePrice,
    pub highest: VenuePrice,
    pub spread_pct: Decimal,
    pub venue_count: usize,
}

/// Everything derived from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub min_profit_threshold_pct: Decimal,
    pub quotes: Vec<Quote>,
    pub opportunities: Vec<Opportunity>,
    pub summary: Option<MarketSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(venue: &str, bid: Decimal, ask: Decimal) -> Quote {
        Quote::new(venue, "XRP/USDT", bid, ask, (bid + ask) / dec!(2))
    }

    #[test]
    fn parses_trading_pair() {
        let pair: TradingPair = "xrp/usdt".parse().unwrap();
        assert_eq!(pair, TradingPair::new("XRP", "USDT"));
        assert_eq!(pair.to_string(), "XRP/USDT");
        assert_eq!(pair.concatenated(), "XRPUSDT");
        assert_eq!(pair.dashed(), "XRP-USDT");
        assert!("XRPUSDT".parse::<TradingPair>().is_err());
        assert!("XRP/".parse::<TradingPair>().is_err());
    }

    #[test]
    fn snapshot_rejects_duplicate_venue() {
        let err = QuoteSnapshot::new(vec![
            quote("kraken", dec!(0.50), dec!(0.51)),
            quote("kraken", dec!(0.52), dec!(0.53)),
        ])
        .unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateVenue("kraken".to_string()));
    }

    #[test]
    fn snapshot_rejects_crossed_book() {
        let err = QuoteSnapshot::new(vec![quote("okx", dec!(0.52), dec!(0.51))]).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidQuote { ref venue, .. } if venue == "okx"));
    }

    #[test]
    fn snapshot_rejects_non_positive_prices() {
        let mut q = quote("bybit", dec!(0.50), dec!(0.51));
        q.last = Decimal::ZERO;
        assert!(QuoteSnapshot::new(vec![q]).is_err());

        let q = quote("bybit", dec!(-1), dec!(0.51));
        assert!(QuoteSnapshot::new(vec![q]).is_err());
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let snapshot = QuoteSnapshot::new(vec![
            quote("kraken", dec!(0.50), dec!(0.51)),
            quote("bitstamp", dec!(0.49), dec!(0.50)),
        ])
        .unwrap();
        assert_eq!(snapshot.venues(), vec!["kraken", "bitstamp"]);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("BITSTAMP").is_some());
    }

    #[test]
    fn locked_book_is_valid() {
        assert!(quote("gemini", dec!(0.5), dec!(0.5)).validate().is_ok());
    }

    #[test]
    fn projections_scale_profit_per_unit() {
        let opp = Opportunity {
            buy_venue: "a".into(),
            sell_venue: "b".into(),
            buy_symbol: "XRP/USD".into(),
            sell_symbol: "XRP/USD".into(),
            buy_price: dec!(1),
            sell_price: dec!(1.01),
            buy_fee_rate: dec!(0),
            sell_fee_rate: dec!(0),
            buy_cost_with_fees: dec!(1),
            sell_revenue_with_fees: dec!(1.01),
            profit_per_unit: dec!(0.01),
            profit_pct: dec!(1),
        };
        let projections = opp.projections(&[dec!(100), dec!(1000)]);
        assert_eq!(projections[0].profit, dec!(1.00));
        assert_eq!(projections[1].profit, dec!(10.00));

        let extreme = Opportunity {
            profit_per_unit: Decimal::MAX,
            ..opp
        };
        assert_eq!(extreme.projected_profit(dec!(10000)), Decimal::MAX);
        assert_eq!(extreme.projections(&[dec!(1), dec!(10000)])[1].profit, Decimal::MAX);
    }
}
