use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;
use xrp_arb_core::types::*;
use xrp_arb_core::{Config, MarketScanner, OpportunityEvaluator};

/// Shared application state accessible from all API handlers
pub struct AppState {
    pub config: Config,
    pub scanner: MarketScanner,
    pub venues: Vec<String>,
    pub latest: RwLock<Option<ScanReport>>,
    pub engine_running: AtomicBool,
    pub start_time: Instant,
    pub scans_completed: AtomicU64,
    pub opportunities_count: AtomicU64,
}

/// Engine status
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub scans_completed: u64,
    pub opportunities_found: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub venues: Vec<String>,
    pub min_profit_threshold_pct: Decimal,
}

/// Opportunity with profit projections at the reference volumes
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityView {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub projections: Vec<ProjectedProfit>,
}

impl AppState {
    pub fn new(config: Config, venues: Vec<String>) -> Self {
        let scanner = MarketScanner::new(OpportunityEvaluator::new(
            config.fee_schedule(),
            config.engine.min_profit_threshold_pct,
        ));
        Self {
            config,
            scanner,
            venues,
            latest: RwLock::new(None),
            engine_running: AtomicBool::new(false),
            start_time: Instant::now(),
            scans_completed: AtomicU64::new(0),
            opportunities_count: AtomicU64::new(0),
        }
    }

    /// Replace the latest report
    pub async fn record_report(&self, report: ScanReport) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.opportunities_count
            .fetch_add(report.opportunities.len() as u64, Ordering::Relaxed);
        *self.latest.write().await = Some(report);
    }

    pub fn with_projections(&self, opportunities: &[Opportunity]) -> Vec<OpportunityView> {
        let volumes = &self.config.engine.reference_volumes;
        opportunities
            .iter()
            .map(|opp| OpportunityView {
                opportunity: opp.clone(),
                projections: opp.projections(volumes),
            })
            .collect()
    }

    /// Get engine status
    pub async fn get_status(&self) -> EngineStatus {
        let last_scan_at = self.latest.read().await.as_ref().map(|r| r.scanned_at);

        EngineStatus {
            running: self.engine_running.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            opportunities_found: self.opportunities_count.load(Ordering::Relaxed),
            last_scan_at,
            venues: self.venues.clone(),
            min_profit_threshold_pct: self.config.engine.min_profit_threshold_pct,
        }
    }
}
