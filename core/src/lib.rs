pub mod arbitrage;
pub mod collector;
pub mod config;
pub mod error;
pub mod exchange;
pub mod fees;
pub mod summary;
pub mod types;

pub use arbitrage::{analyze, scan, MarketScanner, OpportunityEvaluator};
pub use collector::QuoteCollector;
pub use config::Config;
pub use error::SnapshotError;
pub use fees::{FeeSchedule, DEFAULT_FEE_RATE};
pub use summary::summarize;
pub use types::*;
