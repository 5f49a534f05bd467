// =============================================================================
// Failure responses
// =============================================================================
//
// Every failure goes out as `{"error": "<code>"}` with a non-2xx status.
// Internal detail stays in the log.
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::service::ServiceError;

/// Body of every failure response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>) -> Self {
        Self { error: code.into() }
    }
}

/// Build a failure response from a status and a stable code.
pub fn error_response(status: StatusCode, code: &str) -> Response {
    (status, Json(ErrorBody::new(code))).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Processing(detail) => {
                error!(detail = %detail, "request failed with a processing fault");
            }
            ServiceError::Decode(_) | ServiceError::NoUsableData => {
                warn!(code = self.code(), error = %self, "request rejected");
            }
        }
        error_response(self.status(), self.code())
    }
}
