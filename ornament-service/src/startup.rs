//! Application startup and lifecycle management.

use crate::config::OrnamentConfig;
use crate::content::ContentCatalog;
use crate::handlers::{content, health, metrics, page, recognize};
use crate::middleware::metrics::metrics_middleware;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use crate::services::RecognitionService;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OrnamentConfig>,
    pub content: Arc<ContentCatalog>,
    pub recognition: Arc<RecognitionService>,
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.recognition.max_body_bytes;

    Router::new()
        .route("/", get(page::index))
        .route(
            "/api/recognize",
            post(recognize::recognize).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .route("/api/translations/:lang", get(content::translation))
        .route("/api/ornaments", get(content::list_ornaments))
        .route("/api/ornaments/:id", get(content::get_ornament))
        .route("/api/survey", get(content::survey))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(metrics::metrics))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Gemini provider from `config`.
    pub async fn build(config: OrnamentConfig) -> Result<Self, AppError> {
        let gemini = &config.gemini;
        let provider = GeminiVisionProvider::new(GeminiConfig {
            api_key: gemini.api_key.clone(),
            model: gemini.model.clone(),
            api_base: gemini.api_base.clone(),
            timeout: gemini.timeout(),
            temperature: gemini.temperature,
            max_output_tokens: gemini.max_output_tokens,
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: OrnamentConfig,
        provider: Arc<dyn VisionProvider>,
    ) -> Result<Self, AppError> {
        let content = ContentCatalog::embedded().map_err(|e| {
            tracing::error!("Failed to load page content: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e))
        })?;

        match provider.health_check().await {
            Ok(_) => tracing::info!(
                provider = provider.name(),
                model = %provider.model(),
                "Initialized vision provider"
            ),
            Err(e) => tracing::warn!(
                provider = provider.name(),
                error = %e,
                "Vision provider is not configured; recognition requests will fail"
            ),
        }

        let recognition = RecognitionService::new(
            provider,
            config.recognition.max_concurrent,
            config.gemini.timeout(),
        );

        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState {
            config: Arc::new(config),
            content: Arc::new(content),
            recognition: Arc::new(recognition),
        };

        tracing::info!("Ornament service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.port
    }

    /// Serve until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
