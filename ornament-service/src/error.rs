//! Errors of the recognition proxy.
//!
//! Every variant is reported as HTTP 500 with `{error, kind}` so callers of
//! `/api/recognize` only ever see a success payload or an error record.

use crate::models::{ImageError, UnknownLang};
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Recognition is not configured: {0}")]
    NotConfigured(String),

    #[error("Recognition timed out after {0:?}")]
    Timeout(Duration),

    #[error("AI provider error: {0}")]
    Provider(ProviderError),

    #[error("AI provider returned an invalid result: {0}")]
    InvalidOutput(String),

    #[error("Too many recognitions in progress, please retry shortly")]
    Busy,
}

impl RecognitionError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RecognitionError::BadRequest(_) => "bad_request",
            RecognitionError::NotConfigured(_) => "not_configured",
            RecognitionError::Timeout(_) => "timeout",
            RecognitionError::Provider(_) => "provider",
            RecognitionError::InvalidOutput(_) => "invalid_output",
            RecognitionError::Busy => "busy",
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecognitionError::BadRequest(_))
    }
}

impl From<ProviderError> for RecognitionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => RecognitionError::NotConfigured(msg),
            ProviderError::Timeout(after) => RecognitionError::Timeout(after),
            other => RecognitionError::Provider(other),
        }
    }
}

impl From<ImageError> for RecognitionError {
    fn from(err: ImageError) -> Self {
        RecognitionError::BadRequest(err.to_string())
    }
}

impl From<UnknownLang> for RecognitionError {
    fn from(err: UnknownLang) -> Self {
        RecognitionError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for RecognitionError {
    fn from(err: validator::ValidationErrors) -> Self {
        RecognitionError::BadRequest(err.to_string())
    }
}

impl IntoResponse for RecognitionError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            kind: &'static str,
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
                kind: self.kind(),
            }),
        )
            .into_response()
    }
}
