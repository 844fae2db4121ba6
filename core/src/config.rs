use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fees::{FeeSchedule, DEFAULT_FEE_RATE};

/// Symbols tried when a venue has none configured
pub const DEFAULT_SYMBOLS: [&str; 2] = ["XRP/USDT", "XRP/USD"];

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub fees: FeeConfig,
    pub venues: BTreeMap<String, VenueConfig>,
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum profit percentage required to report an opportunity
    pub min_profit_threshold_pct: Decimal,
    pub scan_interval_ms: u64,
    /// Pause between venue requests within one collection cycle
    pub inter_venue_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub api_port: u16,
    /// Volumes (in XRP) used for projected profit reporting
    pub reference_volumes: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Fee rate for venues without their own entry
    pub default_rate: Decimal,
}

/// Per-venue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub enabled: bool,
    /// Symbols to try in order, e.g. ["XRP/USDT", "XRP/USD"]
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Fractional trading fee (0.001 = 0.1%)
    pub fee_rate: Decimal,
}

impl VenueConfig {
    fn new(enabled: bool, symbols: &[&str], fee_rate: Decimal) -> Self {
        Self {
            enabled,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            fee_rate,
        }
    }

    pub fn symbols_or_default(&self) -> Vec<String> {
        if self.symbols.is_empty() {
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
        } else {
            self.symbols.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut venues = BTreeMap::new();
        venues.insert(
            "bybit".to_string(),
            VenueConfig::new(true, &["XRP/USDT", "XRP/USDC"], Decimal::new(1, 3)), // 0.1%
        );
        venues.insert(
            "bitget".to_string(),
            VenueConfig::new(true, &["XRP/USDT", "XRP/USDC"], Decimal::new(1, 3)), // 0.1%
        );
        venues.insert(
            "okx".to_string(),
            VenueConfig::new(true, &["XRP/USDT", "XRP/USD"], Decimal::new(1, 3)), // 0.1%
        );
        // Fee-only entries for venues quoted through the scan endpoint
        venues.insert(
            "kraken".to_string(),
            VenueConfig::new(false, &["XRP/USD", "XRP/USDT"], Decimal::new(26, 4)), // 0.26%
        );
        venues.insert(
            "bitstamp".to_string(),
            VenueConfig::new(false, &["XRP/USD", "XRP/EUR"], Decimal::new(4, 3)), // 0.4%
        );

        Config {
            engine: EngineConfig {
                min_profit_threshold_pct: Decimal::new(2, 1), // 0.2%
                scan_interval_ms: 30_000,
                inter_venue_delay_ms: 500,
                request_timeout_ms: 10_000,
                api_port: 8080,
                reference_volumes: vec![
                    Decimal::new(100, 0),
                    Decimal::new(1_000, 0),
                    Decimal::new(10_000, 0),
                ],
            },
            fees: FeeConfig {
                default_rate: DEFAULT_FEE_RATE,
            },
            venues,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}. Using defaults.", e);
                Self::default()
            }),
            Err(_) => {
                tracing::info!("No config file found at {}. Using defaults.", path);
                Self::default()
            }
        }
    }

    /// Fee schedule covering every configured venue, enabled or not
    pub fn fee_schedule(&self) -> FeeSchedule {
        let mut schedule = FeeSchedule::new(self.fees.default_rate);
        for (name, venue) in &self.venues {
            schedule.insert(name, venue.fee_rate);
        }
        schedule
    }

    pub fn enabled_venues(&self) -> impl Iterator<Item = (&String, &VenueConfig)> {
        self.venues.iter().filter(|(_, cfg)| cfg.enabled)
    }
}
