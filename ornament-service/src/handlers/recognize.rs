use crate::error::RecognitionError;
use crate::services::{metrics, Recognition, RecognitionService};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::header,
    response::{IntoResponse, Response},
};

/// `POST /api/recognize`: relay one image to the vision provider.
///
/// Answers 200 with the validated ornament JSON, or 500 with
/// `{error, kind}` for every failure, including unreadable bodies.
#[tracing::instrument(skip(state, body))]
pub async fn recognize(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RecognitionError> {
    match relay(&state, body).await {
        Ok(Recognition { body, description }) => {
            metrics::record_recognition("success");
            tracing::info!(
                name_kz = description.name_kz.as_deref().unwrap_or_default(),
                "Ornament recognized"
            );
            Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
        }
        Err(e) => {
            metrics::record_recognition(e.kind());
            if e.is_client_error() {
                tracing::warn!(kind = e.kind(), error = %e, "Rejected recognition request");
            } else {
                tracing::error!(kind = e.kind(), error = %e, "Ornament recognition failed");
            }
            Err(e)
        }
    }
}

async fn relay(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<Recognition, RecognitionError> {
    let body = body.map_err(|e| RecognitionError::BadRequest(e.body_text()))?;
    let (image, lang) = RecognitionService::parse_request(&body)?;
    state.recognition.recognize(&image, lang).await
}
