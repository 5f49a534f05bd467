// =============================================================================
// Signal Service: payload in, flat signal mapping or structured failure out
// =============================================================================
//
// decode ─▶ engine::compute ─▶ SignalResponse
//
// `handle` is synchronous and stateless. `handle_blocking` runs it on the
// blocking pool so that a panic inside the computation surfaces as a
// processing fault for that one request instead of taking the worker down.
// =============================================================================

pub mod decode;
pub mod error;

pub use decode::decode_bars;
pub use error::ServiceError;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::engine::{self, ResultRow};
use crate::types::Signal;

/// Layout used for the `date` field of a response. Fractional seconds are
/// printed only when the bar carries them.
pub const RESPONSE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Successful response body.
///
/// `date` is carried in addition to the eight signal fields so the caller can
/// tell which bar the signal belongs to. `entry_point` is `null` on NEUTRAL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResponse {
    pub date: String,
    pub vwap: f64,
    pub signal: Signal,
    pub signal_explanation: String,
    pub entry_point: Option<f64>,
    pub major_support: f64,
    pub major_resistance: f64,
    pub minor_support: f64,
    pub minor_resistance: f64,
}

impl From<&ResultRow> for SignalResponse {
    fn from(row: &ResultRow) -> Self {
        Self {
            date: row.date.format(RESPONSE_DATE_FORMAT).to_string(),
            vwap: row.vwap,
            signal: row.signal,
            signal_explanation: row.signal_explanation.to_string(),
            entry_point: row.entry_point,
            major_support: row.major_support,
            major_resistance: row.major_resistance,
            minor_support: row.minor_support,
            minor_resistance: row.minor_resistance,
        }
    }
}

/// Decode `raw`, run the engine, and project the last row.
pub fn handle(raw: &[u8]) -> Result<SignalResponse, ServiceError> {
    let rows = decode_bars(raw).map_err(|e| {
        warn!(payload_bytes = raw.len(), error = %e, "rejecting payload");
        e
    })?;

    let Some(row) = engine::compute(&rows) else {
        warn!(
            payload_bytes = raw.len(),
            rows = rows.len(),
            "payload decoded but no usable bars remain"
        );
        return Err(ServiceError::NoUsableData);
    };

    if !row.is_finite() {
        let err = ServiceError::Processing(format!("non-finite value in result row {row:?}"));
        error!(
            payload_bytes = raw.len(),
            rows = rows.len(),
            error = %err,
            "indicator computation produced an invalid row"
        );
        return Err(err);
    }

    info!(
        rows = rows.len(),
        signal = %row.signal,
        vwap = row.vwap,
        "signal computed"
    );
    Ok(SignalResponse::from(&row))
}

/// Run [`handle`] on tokio's blocking pool, turning a panic into
/// [`ServiceError::Processing`].
pub async fn handle_blocking(raw: Vec<u8>) -> Result<SignalResponse, ServiceError> {
    let payload_bytes = raw.len();
    match tokio::task::spawn_blocking(move || handle(&raw)).await {
        Ok(result) => result,
        Err(join_err) => {
            error!(payload_bytes, error = %join_err, "signal computation task failed");
            Err(ServiceError::Processing(join_err.to_string()))
        }
    }
}
