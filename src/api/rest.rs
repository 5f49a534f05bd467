// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
//   POST /vwap            raw CSV body in, latest signal out
//   GET  /api/v1/health   liveness probe
//
// No endpoint holds mutable state; the shared `AppState` is read-only config.
// =============================================================================

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Json, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::error::error_response;
use crate::app_state::AppState;
use crate::service;

// =============================================================================
// Router construction
// =============================================================================

/// Build the API router with body limit, optional CORS, and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let enable_cors = state.config.enable_cors;

    let app = Router::new()
        .route("/api/v1/health", get(health))
        .route("/vwap", post(vwap))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.uptime_secs(),
    })
}

// =============================================================================
// VWAP signal
// =============================================================================

async fn vwap(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let preview_chars = state.config.log_preview_chars;

    async move {
        let body = match body {
            Ok(body) => body,
            Err(rejection) => {
                warn!(error = %rejection, "request body rejected");
                return error_response(rejection.status(), "payload_rejected");
            }
        };

        let preview: String = String::from_utf8_lossy(&body)
            .chars()
            .take(preview_chars)
            .collect();
        debug!(bytes = body.len(), preview = %preview, "received payload");

        match service::handle_blocking(body.to_vec()).await {
            Ok(resp) => Json(resp).into_response(),
            Err(e) => e.into_response(),
        }
    }
    .instrument(info_span!("vwap_request", %request_id))
    .await
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorBody;
    use crate::runtime_config::RuntimeConfig;
    use crate::service::SignalResponse;
    use crate::types::Signal;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState::new(RuntimeConfig::default())))
    }

    async fn post_vwap(app: Router, body: impl Into<Body>) -> (StatusCode, Bytes) {
        let req = Request::builder()
            .method("POST")
            .uri("/vwap")
            .header("content-type", "text/csv")
            .body(body.into())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    #[tokio::test]
    async fn health_is_public() {
        let req = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn vwap_success_returns_signal() {
        let csv = "date,open,high,low,close,volume\n\
                   2024.08.01 00:00,10,12,9,11,100\n\
                   2024.08.02 00:00,11,11,11,11,0\n";
        let (status, bytes) = post_vwap(app(), csv).await;
        assert_eq!(status, StatusCode::OK);
        let resp: SignalResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(resp.signal, Signal::Buy);
        assert_eq!(resp.major_support, 9.0);
        assert_eq!(resp.major_resistance, 12.0);
        assert_eq!(resp.date, "2024-08-01 00:00:00");
    }

    #[tokio::test]
    async fn vwap_decode_error_is_400() {
        let (status, bytes) = post_vwap(app(), "date,open,high,low,close\n").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, ErrorBody::new("decode_error"));
    }

    #[tokio::test]
    async fn vwap_no_usable_data_is_422() {
        let csv = "date,open,high,low,close,volume\n2024-08-01,1,2,0.5,1.5,0\n";
        let (status, bytes) = post_vwap(app(), csv).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "no_usable_data");
    }

    #[tokio::test]
    async fn vwap_processing_fault_hides_detail() {
        let csv = "date,open,high,low,close,volume\n2024-08-01,1,1e308,1e308,1e308,1e308\n";
        let (status, bytes) = post_vwap(app(), csv).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "processing_error" }));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let cfg = RuntimeConfig {
            max_body_bytes: 16,
            ..RuntimeConfig::default()
        };
        let app = router(Arc::new(AppState::new(cfg)));
        let csv = "date,open,high,low,close,volume\n2024-08-01,10,12,9,11,100\n";
        let (status, bytes) = post_vwap(app, csv).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "payload_rejected");
    }

    #[tokio::test]
    async fn service_survives_bad_requests() {
        let app = app();
        let (status, _) = post_vwap(app.clone(), vec![0xffu8, 0xfe]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let csv = "date,open,high,low,close,volume\n2024-08-01,100,100,100,100,50\n";
        let (status, _) = post_vwap(app, csv).await;
        assert_eq!(status, StatusCode::OK);
    }
}
