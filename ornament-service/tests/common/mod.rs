#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ornament_service::config::OrnamentConfig;
use ornament_service::services::metrics::init_metrics;
use ornament_service::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use ornament_service::services::providers::VisionProvider;
use ornament_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service around `provider` with a recognition timeout of `timeout`.
    pub async fn spawn_with(provider: Arc<dyn VisionProvider>, timeout: Duration) -> Self {
        init_metrics();

        let mut config = OrnamentConfig::default();
        config.common.host = "127.0.0.1".to_string();
        config.common.port = 0;
        config.gemini.timeout_secs = timeout.as_secs().max(1);

        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn spawn(provider: Arc<dyn VisionProvider>) -> Self {
        Self::spawn_with(provider, Duration::from_secs(5)).await
    }

    /// Spawn the service with the real Gemini client pointed at `api_base`.
    pub async fn spawn_gemini(api_base: &str, api_key: &str, timeout: Duration) -> Self {
        let provider = GeminiVisionProvider::new(GeminiConfig {
            api_key: Secret::new(api_key.to_string()),
            model: GEMINI_MODEL.to_string(),
            api_base: api_base.to_string(),
            timeout,
            temperature: None,
            max_output_tokens: None,
        })
        .expect("Failed to create Gemini provider");

        Self::spawn_with(Arc::new(provider), timeout).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn recognize(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/recognize"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

/// Smallest byte sequence the proxy accepts as a JPEG, base64 encoded.
pub fn jpeg_base64() -> String {
    STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46])
}

/// Model reply wrapped in the fences Gemini tends to add.
pub fn fenced_reply() -> String {
    format!(
        "```json\n{}\n```",
        json!({
            "name_kz": "Қошқар мүйіз",
            "name_ru": "Бараний рог",
            "name_en": "Ram's horn",
            "meaning_kz": "Молшылық белгісі",
            "meaning_ru": "Символ изобилия",
            "meaning_en": "A symbol of abundance",
            "usage": "Сырмақ, текемет"
        })
    )
}

/// `generateContent` response body carrying `text` as the only candidate.
pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 270, "candidatesTokenCount": 95}
    })
}
