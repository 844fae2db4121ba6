use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use uuid::Uuid;

use crate::fees::FeeSchedule;
use crate::summary::summarize;
use crate::types::*;

/// Computes the fee-adjusted profit of buying on one venue and selling on another
#[derive(Debug, Clone)]
pub struct OpportunityEvaluator {
    fees: FeeSchedule,
    /// Strict lower bound on profit percentage
    min_profit_threshold_pct: Decimal,
}

impl OpportunityEvaluator {
    pub fn new(fees: FeeSchedule, min_profit_threshold_pct: Decimal) -> Self {
        Self {
            fees,
            min_profit_threshold_pct,
        }
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn min_profit_threshold_pct(&self) -> Decimal {
        self.min_profit_threshold_pct
    }

    /// Evaluate buying at `buy.ask` and selling at `sell.bid`.
    ///
    /// Fees raise the buy cost and cut the sell revenue. Returns `None` for a
    /// venue paired with itself, for an undefined percentage (zero cost or
    /// arithmetic overflow), and whenever the profit does not strictly exceed the threshold. Quotes are
    /// taken as given: a crossed book is not rejected here.
    pub fn evaluate(&self, buy: &Quote, sell: &Quote) -> Option<Opportunity> {
        if buy.venue.eq_ignore_ascii_case(&sell.venue) {
            return None;
        }

        let buy_fee_rate = self.fees.fee_for(&buy.venue);
        let sell_fee_rate = self.fees.fee_for(&sell.venue);

        // Overflow on extreme prices is treated like an undefined percentage
        let buy_cost_with_fees = buy.ask.checked_mul(Decimal::ONE.checked_add(buy_fee_rate)?)?;
        let sell_revenue_with_fees = sell.bid.checked_mul(Decimal::ONE.checked_sub(sell_fee_rate)?)?;
        let profit_per_unit = sell_revenue_with_fees.checked_sub(buy_cost_with_fees)?;
        let profit_pct = profit_per_unit
            .checked_div(buy_cost_with_fees)?
            .checked_mul(dec!(100))?;

        if profit_pct <= self.min_profit_threshold_pct {
            return None;
        }

        debug!(
            "Opportunity: Buy {} @ {} on {}, Sell {} @ {} on {} | Profit: {}% ({} per unit)",
            buy.symbol,
            buy.ask,
            buy.venue,
            sell.symbol,
            sell.bid,
            sell.venue,
            profit_pct.round_dp(4),
            profit_per_unit.round_dp(6),
        );

        Some(Opportunity {
            buy_venue: buy.venue.clone(),
            sell_venue: sell.venue.clone(),
            buy_symbol: buy.symbol.clone(),
            sell_symbol: sell.symbol.clone(),
            buy_price: buy.ask,
            sell_price: sell.bid,
            buy_fee_rate,
            sell_fee_rate,
            buy_cost_with_fees,
            sell_revenue_with_fees,
            profit_per_unit,
            profit_pct,
        })
    }
}

/// Ranks every directed venue pair in a snapshot
#[derive(Debug, Clone)]
pub struct MarketScanner {
    evaluator: OpportunityEvaluator,
}

impl MarketScanner {
    pub fn new(evaluator: OpportunityEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &OpportunityEvaluator {
        &self.evaluator
    }

    /// Opportunities above the threshold, best first.
    ///
    /// Both directions of each venue pair are evaluated since fees and
    /// bid/ask differ per side. Fewer than two venues yields an empty list.
    pub fn scan(&self, snapshot: &QuoteSnapshot) -> Vec<Opportunity> {
        let quotes = snapshot.quotes();
        if quotes.len() < 2 {
            debug!(
                "Insufficient data: {} venue(s) in snapshot, need at least 2",
                quotes.len()
            );
            return Vec::new();
        }

        let fees = self.evaluator.fees();
        for quote in quotes.iter().filter(|q| !fees.is_known(&q.venue)) {
            debug!(
                "No fee entry for {}, using default rate {}",
                quote.venue,
                fees.default_rate()
            );
        }

        let mut opportunities = Vec::new();
        for (i, a) in quotes.iter().enumerate() {
            for b in &quotes[i + 1..] {
                // Direction 1: buy on a, sell on b
                opportunities.extend(self.evaluator.evaluate(a, b));
                // Direction 2: buy on b, sell on a
                opportunities.extend(self.evaluator.evaluate(b, a));
            }
        }

        // Stable: equal percentages keep evaluation order
        opportunities.sort_by(|x, y| y.profit_pct.cmp(&x.profit_pct));
        opportunities
    }
}

/// Scan a snapshot with an explicit fee schedule and threshold.
pub fn scan(
    snapshot: &QuoteSnapshot,
    fees: &FeeSchedule,
    min_profit_threshold_pct: Decimal,
) -> Vec<Opportunity> {
    MarketScanner::new(OpportunityEvaluator::new(
        fees.clone(),
        min_profit_threshold_pct,
    ))
    .scan(snapshot)
}

/// Run the scanner and the market summary over the same snapshot.
pub fn analyze(snapshot: &QuoteSnapshot, scanner: &MarketScanner) -> ScanReport {
    ScanReport {
        id: Uuid::new_v4(),
        scanned_at: Utc::now(),
        min_profit_threshold_pct: scanner.evaluator().min_profit_threshold_pct(),
        opportunities: scanner.scan(snapshot),
        summary: summarize(snapshot),
        quotes: snapshot.quotes().to_vec(),
    }
}
