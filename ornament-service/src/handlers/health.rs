use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Reports the configured provider without calling it.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let provider = state.recognition.provider();
    let configured = provider.health_check().await.is_ok();

    Json(json!({
        "status": "ok",
        "service": "ornament-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": {
            "name": provider.name(),
            "model": provider.model(),
            "configured": configured
        }
    }))
}

/// Readiness probe: ready once recognition can reach a configured provider.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.recognition.provider().health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::debug!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
