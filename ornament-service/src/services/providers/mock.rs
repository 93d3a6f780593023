//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, VisionProvider};
use crate::models::JpegImage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(ProviderError),
    Delayed(Duration, String),
}

/// Mock vision provider with a canned reply and a call counter.
pub struct MockVisionProvider {
    reply: MockReply,
    enabled: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockVisionProvider {
    fn with_reply(reply: MockReply, enabled: bool) -> Self {
        Self {
            reply,
            enabled,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()), true)
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_reply(MockReply::Error(error), true)
    }

    /// Answers with `text` after sleeping for `delay`.
    pub fn delayed(delay: Duration, text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Delayed(delay, text.into()), true)
    }

    /// Behaves like a provider without an API key.
    pub fn unconfigured() -> Self {
        Self::with_reply(MockReply::Text(String::new()), false)
    }

    /// Number of `generate` calls that reached the provider.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instruction received by the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn response(text: String) -> ProviderResponse {
        ProviderResponse {
            output_tokens: text.len() as i32 / 4,
            text,
            input_tokens: 258,
            finish_reason: FinishReason::Complete,
        }
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-vision"
    }

    async fn generate(
        &self,
        prompt: &str,
        _image: &JpegImage,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.health_check().await?;

        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(Self::response(text.clone())),
            MockReply::Error(error) => Err(error.clone()),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::response(text.clone()))
            }
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock vision provider not enabled".to_string(),
            ))
        }
    }
}
