//! End-to-end flows over the public library API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tower::ServiceExt;

use vwap_signal_server::api::rest::router;
use vwap_signal_server::app_state::AppState;
use vwap_signal_server::broker::{BarQuery, BrokerSession, OrderOutcome, PaperBroker, Timeframe};
use vwap_signal_server::engine;
use vwap_signal_server::execution::execute_signal;
use vwap_signal_server::market_data::{Bar, RawBar};
use vwap_signal_server::runtime_config::RuntimeConfig;
use vwap_signal_server::service::{self, SignalResponse};
use vwap_signal_server::types::Signal;

fn day(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 8, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(n)
}

/// A rising gold-like daily series that ends well above its VWAP.
fn rising_series(n: i64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 1900.0 + i as f64 * 4.0;
            Bar {
                date: day(i),
                open: base,
                high: base + 6.0,
                low: base - 3.0,
                close: base + 5.0,
                volume: 1_000.0 + (i % 5) as f64 * 100.0,
            }
        })
        .collect()
}

fn to_csv(bars: &[Bar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y.%m.%d %H:%M"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}

#[tokio::test]
async fn fetch_compute_and_execute() {
    let broker = PaperBroker::connect(rising_series(60));
    let query = BarQuery {
        symbol: "XAUUSD".into(),
        timeframe: Timeframe::D1,
        from: day(10),
        to: day(59),
    };

    let bars = broker.fetch_bars(&query).await.unwrap();
    assert_eq!(bars.len(), 50);

    let rows: Vec<RawBar> = bars.into_iter().map(RawBar::from).collect();
    let result = engine::compute(&rows).unwrap();
    assert_eq!(result.signal, Signal::Buy);
    assert_eq!(result.date, day(59));

    let cfg = RuntimeConfig::default();
    let outcome = execute_signal(&broker, &result, "XAUUSD", &cfg.execution)
        .await
        .unwrap();
    assert!(matches!(outcome, Some(OrderOutcome::Accepted { .. })));

    let fill = &broker.fills()[0];
    assert_eq!(Some(fill.order.price), result.entry_point);
    assert!(fill.order.stop_loss < fill.order.price);

    broker.shutdown().await.unwrap();
    assert!(broker.fetch_bars(&query).await.is_err());
}

#[test]
fn csv_path_matches_direct_engine_call() {
    let bars = rising_series(20);
    let direct = engine::compute(&bars.iter().cloned().map(RawBar::from).collect::<Vec<_>>())
        .unwrap();
    let via_service = service::handle(to_csv(&bars).as_bytes()).unwrap();
    assert_eq!(via_service, SignalResponse::from(&direct));
}

#[tokio::test]
async fn http_round_trip() {
    let app = router(Arc::new(AppState::new(RuntimeConfig::default())));
    let req = Request::builder()
        .method("POST")
        .uri("/vwap")
        .body(Body::from(to_csv(&rising_series(15))))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: SignalResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.signal, Signal::Buy);
    assert_eq!(body.entry_point, Some(body.vwap));
    assert!(body.major_support <= body.minor_support);
    assert!(body.major_resistance >= body.minor_resistance);
}
