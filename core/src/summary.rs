use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{MarketSummary, QuoteSnapshot, VenuePrice};

/// Lowest/highest last price and the spread between them.
///
/// Returns `None` for an empty snapshot: there is no lowest price to divide by.
/// A single quote gives a 0% spread. On equal prices the earlier venue wins.
/// A spread too large to represent saturates at `Decimal::MAX`.
pub fn summarize(snapshot: &QuoteSnapshot) -> Option<MarketSummary> {
    let quotes = snapshot.quotes();
    let first = quotes.first()?;

    let mut lowest = first;
    let mut highest = first;
    for quote in &quotes[1..] {
        if quote.last < lowest.last {
            lowest = quote;
        }
        if quote.last > highest.last {
            highest = quote;
        }
    }

    // lowest.last > 0 for every validated snapshot, so only overflow fails here
    let spread_pct = (highest.last - lowest.last)
        .checked_div(lowest.last)
        .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(dec!(100)));

    Some(MarketSummary {
        lowest: VenuePrice {
            venue: lowest.venue.clone(),
            price: lowest.last,
        },
        highest: VenuePrice {
            venue: highest.venue.clone(),
            price: highest.last,
        },
        spread_pct,
        venue_count: quotes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quote;

    fn snapshot(lasts: &[(&str, Decimal)]) -> QuoteSnapshot {
        QuoteSnapshot::new(
            lasts
                .iter()
                .map(|(venue, last)| Quote::new(*venue, "XRP/USD", *last, *last, *last))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn spread_between_extremes() {
        let summary = summarize(&snapshot(&[
            ("kraken", dec!(0.52)),
            ("bitstamp", dec!(0.50)),
            ("gemini", dec!(0.51)),
        ]))
        .unwrap();

        assert_eq!(summary.lowest.venue, "bitstamp");
        assert_eq!(summary.lowest.price, dec!(0.50));
        assert_eq!(summary.highest.venue, "kraken");
        assert_eq!(summary.highest.price, dec!(0.52));
        assert_eq!(summary.spread_pct, dec!(4));
        assert_eq!(summary.venue_count, 3);
    }

    #[test]
    fn single_venue_has_zero_spread() {
        let summary = summarize(&snapshot(&[("kraken", dec!(0.52))])).unwrap();
        assert_eq!(summary.spread_pct, Decimal::ZERO);
        assert_eq!(summary.lowest, summary.highest);
    }

    #[test]
    fn empty_snapshot_has_no_summary() {
        assert!(summarize(&QuoteSnapshot::empty()).is_none());
    }

    #[test]
    fn ties_keep_first_venue() {
        let summary = summarize(&snapshot(&[("okx", dec!(0.5)), ("bybit", dec!(0.5))])).unwrap();
        assert_eq!(summary.lowest.venue, "okx");
        assert_eq!(summary.highest.venue, "okx");
    }

    #[test]
    fn unrepresentable_spread_saturates() {
        let tiny = Decimal::new(1, 28);

        let summary = summarize(&snapshot(&[("dust", tiny), ("kraken", dec!(1))])).unwrap();
        assert_eq!(summary.lowest.venue, "dust");
        assert_eq!(summary.spread_pct, Decimal::MAX);

        // The ratio itself no longer fits
        let summary = summarize(&snapshot(&[("dust", tiny), ("kraken", dec!(70))])).unwrap();
        assert_eq!(summary.spread_pct, Decimal::MAX);
        assert_eq!(summary.venue_count, 2);
    }

    #[test]
    fn summarize_is_idempotent() {
        let snap = snapshot(&[("kraken", dec!(0.52)), ("bitstamp", dec!(0.50))]);
        assert_eq!(summarize(&snap), summarize(&snap));
    }
}
