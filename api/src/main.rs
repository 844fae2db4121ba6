mod routes;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xrp_arb_core::{analyze, Config, QuoteCollector};

use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("XRP arbitrage scanner starting...");

    // Load configuration
    let config = Config::load("config.toml");
    let api_port = config.engine.api_port;
    let interval = Duration::from_millis(config.engine.scan_interval_ms);

    info!(
        "Configuration loaded: min_profit={}%, default_fee={}, interval={}ms",
        config.engine.min_profit_threshold_pct,
        config.fees.default_rate,
        config.engine.scan_interval_ms
    );

    let collector = QuoteCollector::from_config(&config);
    let venues: Vec<String> = collector.venues().iter().map(|v| v.to_string()).collect();
    if venues.len() < 2 {
        warn!(
            "Only {} venue(s) enabled; pairwise scans will find nothing",
            venues.len()
        );
    }

    // Create shared state
    let app_state = Arc::new(AppState::new(config, venues));

    // Collect → scan → summarize on a fixed interval
    let engine_state = app_state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;

            let snapshot = collector.collect().await;
            let report = analyze(&snapshot, &engine_state.scanner);

            match &report.summary {
                Some(summary) => info!(
                    "Market: low {} on {}, high {} on {} | spread {}% | {} opportunities",
                    summary.lowest.price,
                    summary.lowest.venue,
                    summary.highest.price,
                    summary.highest.venue,
                    summary.spread_pct.round_dp(4),
                    report.opportunities.len()
                ),
                None => warn!("No prices were fetched successfully"),
            }
            if let Some(best) = report.opportunities.first() {
                info!(
                    "Best: buy on {} @ {}, sell on {} @ {} | {}%",
                    best.buy_venue,
                    best.buy_price,
                    best.sell_venue,
                    best.sell_price,
                    best.profit_pct.round_dp(4)
                );
            }

            engine_state.record_report(report).await;
        }
    });

    // Mark engine as running
    app_state.engine_running.store(true, Ordering::Relaxed);

    info!("API server listening on http://0.0.0.0:{}", api_port);

    // Start HTTP server
    let state_data = app_state.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state_data.clone()))
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", api_port))?
    .run()
    .await
}
