use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use xrp_arb_core::types::{Quote, QuoteSnapshot};
use xrp_arb_core::{analyze, MarketScanner, OpportunityEvaluator};

use crate::state::AppState;

/// GET /api/quotes — quotes from the latest collection cycle
pub async fn get_quotes(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let latest = state.latest.read().await;
    let quotes: Vec<Quote> = latest.as_ref().map(|r| r.quotes.clone()).unwrap_or_default();
    HttpResponse::Ok().json(quotes)
}

/// GET /api/opportunities — ranked opportunities from the latest cycle
pub async fn get_opportunities(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let latest = state.latest.read().await;
    let views = latest
        .as_ref()
        .map(|r| state.with_projections(&r.opportunities))
        .unwrap_or_default();
    HttpResponse::Ok().json(views)
}

/// GET /api/summary — market spread from the latest cycle
pub async fn get_summary(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let latest = state.latest.read().await;
    match latest.as_ref().and_then(|r| r.summary.as_ref()) {
        Some(summary) => HttpResponse::Ok().json(summary),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": "no quotes collected yet"
        })),
    }
}

/// GET /api/status — engine status
pub async fn get_status(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let status = state.get_status().await;
    HttpResponse::Ok().json(status)
}

#[derive(Deserialize)]
pub struct ScanRequest {
    pub quotes: Vec<Quote>,
    pub min_profit_threshold_pct: Option<Decimal>,
}

/// POST /api/scan — analyze a caller-supplied snapshot
pub async fn post_scan(
    state: web::Data<Arc<AppState>>,
    body: web::Json<ScanRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let snapshot = match QuoteSnapshot::new(body.quotes) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    };

    let report = match body.min_profit_threshold_pct {
        Some(threshold) => {
            let scanner = MarketScanner::new(OpportunityEvaluator::new(
                state.scanner.evaluator().fees().clone(),
                threshold,
            ));
            analyze(&snapshot, &scanner)
        }
        None => analyze(&snapshot, &state.scanner),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "id": report.id,
        "scanned_at": report.scanned_at,
        "min_profit_threshold_pct": report.min_profit_threshold_pct,
        "opportunities": state.with_projections(&report.opportunities),
        "summary": report.summary,
    }))
}

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/quotes", web::get().to(get_quotes))
            .route("/opportunities", web::get().to(get_opportunities))
            .route("/summary", web::get().to(get_summary))
            .route("/status", web::get().to(get_status))
            .route("/scan", web::post().to(post_scan)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use xrp_arb_core::Config;

    fn app_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config::default(), vec!["bybit".to_string()]))
    }

    #[actix_web::test]
    async fn scan_ranks_supplied_quotes() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/scan")
            .set_json(serde_json::json!({
                "min_profit_threshold_pct": "0.1",
                "quotes": [
                    { "venue": "x", "symbol": "XRP/USD", "bid": "0.9995", "ask": "1.0000", "last": "1.0" },
                    { "venue": "y", "symbol": "XRP/USD", "bid": "1.0400", "ask": "1.0410", "last": "1.04" }
                ]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let opps = body["opportunities"].as_array().unwrap();
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0]["buy_venue"], "x");
        assert_eq!(opps[0]["sell_venue"], "y");
        assert_eq!(opps[0]["projections"].as_array().unwrap().len(), 3);
        assert_eq!(body["summary"]["highest"]["venue"], "y");
    }

    #[actix_web::test]
    async fn scan_rejects_crossed_quote() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/scan")
            .set_json(serde_json::json!({
                "quotes": [
                    { "venue": "x", "symbol": "XRP/USD", "bid": "1.1", "ask": "1.0", "last": "1.0" }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn summary_missing_before_first_cycle() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/summary").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/opportunities").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[actix_web::test]
    async fn quotes_and_status_follow_latest_report() {
        let state = app_state();
        let snapshot = QuoteSnapshot::new(vec![
            Quote::new("x", "XRP/USD", Decimal::new(9995, 4), Decimal::new(10000, 4), Decimal::ONE),
            Quote::new("y", "XRP/USD", Decimal::new(104, 2), Decimal::new(1041, 3), Decimal::new(104, 2)),
        ])
        .unwrap();
        state.record_report(analyze(&snapshot, &state.scanner)).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/quotes").to_request();
        let quotes: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let quotes = quotes.as_array().unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0]["venue"], "x");
        assert_eq!(quotes[1]["venue"], "y");

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["scans_completed"], 1);
        assert_eq!(status["opportunities_found"], 1);
        assert_eq!(status["venues"], serde_json::json!(["bybit"]));
        assert_eq!(status["running"], false);
        assert!(status["last_scan_at"].is_string());
    }
}
