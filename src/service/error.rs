// =============================================================================
// Service error taxonomy
// =============================================================================

use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while turning a payload into a signal.
///
/// The `String` payloads are operator detail. They go to the log and never
/// to the caller; callers only ever see [`ServiceError::code`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Payload is not a well-formed table, lacks a required column, or has an
    /// unparseable date or numeric cell (400).
    #[error("payload could not be decoded: {0}")]
    Decode(String),

    /// Payload decoded, but no bar survived cleaning (422).
    #[error("no usable bars after cleaning")]
    NoUsableData,

    /// Any other fault while computing (500).
    #[error("processing fault: {0}")]
    Processing(String),
}

impl ServiceError {
    /// Machine-stable code returned in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::NoUsableData => "no_usable_data",
            Self::Processing(_) => "processing_error",
        }
    }

    /// Transport status paired with the code.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::NoUsableData => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
