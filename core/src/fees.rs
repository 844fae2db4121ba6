use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Rate applied to venues missing from the schedule (0.5%)
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.005);

/// Per-venue trading fee rates, as fractions (0.0026 = 0.26%)
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    rates: HashMap<String, Decimal>,
    default_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_RATE)
    }
}

impl FeeSchedule {
    pub fn new(default_rate: Decimal) -> Self {
        Self {
            rates: HashMap::new(),
            default_rate,
        }
    }

    pub fn with_rate(mut self, venue: &str, rate: Decimal) -> Self {
        self.insert(venue, rate);
        self
    }

    pub fn insert(&mut self, venue: &str, rate: Decimal) {
        self.rates.insert(venue.to_lowercase(), rate);
    }

    /// Fee rate for `venue`, falling back to the default rate.
    pub fn fee_for(&self, venue: &str) -> Decimal {
        self.rates
            .get(&venue.to_lowercase())
            .copied()
            .unwrap_or(self.default_rate)
    }

    pub fn default_rate(&self) -> Decimal {
        self.default_rate
    }

    pub fn is_known(&self, venue: &str) -> bool {
        self.rates.contains_key(&venue.to_lowercase())
    }
}
