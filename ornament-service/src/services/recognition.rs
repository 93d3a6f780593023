//! Ornament recognition pipeline.
//!
//! Parses the proxy request, asks the vision provider about the image and
//! turns the model's reply into a validated [`OrnamentDescription`] payload.

use crate::error::RecognitionError;
use crate::models::{JpegImage, Lang, OrnamentDescription, RecognitionRequest};
use crate::services::metrics;
use crate::services::providers::{GenerationParams, VisionProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use validator::Validate;

const INSTRUCTION: &str = r#"You are an expert in Kazakh National Ornaments.
Analyze the provided image and identify the dominant ornament.
Return ONLY a JSON object in this format:
{
  "name_kz": "Name in Kazakh",
  "name_ru": "Name in Russian",
  "name_en": "Name in English",
  "meaning_kz": "Deep symbolic meaning in Kazakh",
  "meaning_ru": "Deep symbolic meaning in Russian",
  "meaning_en": "Deep symbolic meaning in English",
  "usage": "Traditional usage examples"
}
Base your answer on traditional Kazakh culture and semiotics."#;

/// Instruction sent with every image. Only the `usage` language varies.
pub fn build_prompt(lang: Lang) -> String {
    format!(
        "{}\nWrite the \"usage\" field in {}.",
        INSTRUCTION,
        lang.english_name()
    )
}

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````)
/// wherever they occur, then trim.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse and check model output after fence stripping.
///
/// Returns the JSON text to send back together with the typed description.
/// Prose around a single JSON object is dropped.
pub fn parse_model_output(text: &str) -> Result<(String, OrnamentDescription), RecognitionError> {
    let stripped = strip_code_fences(text);

    let (body, value) = match serde_json::from_str::<Value>(&stripped) {
        Ok(value) => (stripped, value),
        Err(parse_err) => {
            let embedded = match (stripped.find('{'), stripped.rfind('}')) {
                (Some(start), Some(end)) if start < end => &stripped[start..=end],
                _ => {
                    return Err(RecognitionError::InvalidOutput(format!(
                        "response is not JSON: {}",
                        parse_err
                    )))
                }
            };
            let value = serde_json::from_str::<Value>(embedded).map_err(|e| {
                RecognitionError::InvalidOutput(format!("response is not JSON: {}", e))
            })?;
            (embedded.to_string(), value)
        }
    };

    let object = value.as_object().ok_or_else(|| {
        RecognitionError::InvalidOutput("response is not a JSON object".to_string())
    })?;

    for field in OrnamentDescription::FIELDS {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(RecognitionError::InvalidOutput(format!(
                    "field `{}` must be a string",
                    field
                )))
            }
        }
    }

    let description: OrnamentDescription = serde_json::from_value(value)
        .map_err(|e| RecognitionError::InvalidOutput(e.to_string()))?;

    if !description.has_name() {
        return Err(RecognitionError::InvalidOutput(
            "response names no ornament".to_string(),
        ));
    }

    Ok((body, description))
}

/// A recognition that passed validation.
#[derive(Debug, Clone)]
pub struct Recognition {
    /// JSON text returned to the caller.
    pub body: String,
    pub description: OrnamentDescription,
}

/// Relays images to the vision provider with a timeout and a cap on
/// concurrent provider calls. Never retries.
pub struct RecognitionService {
    provider: Arc<dyn VisionProvider>,
    limiter: Arc<Semaphore>,
    timeout: Duration,
}

impl RecognitionService {
    /// `max_concurrent` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(provider: Arc<dyn VisionProvider>, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            provider,
            limiter: Arc::new(Semaphore::new(
                max_concurrent.clamp(1, Semaphore::MAX_PERMITS),
            )),
            timeout,
        }
    }

    pub fn provider(&self) -> &Arc<dyn VisionProvider> {
        &self.provider
    }

    /// Decode a raw request body. The content type is not checked.
    pub fn parse_request(body: &[u8]) -> Result<(JpegImage, Lang), RecognitionError> {
        if body.is_empty() {
            return Err(RecognitionError::BadRequest(
                "request body is empty".to_string(),
            ));
        }

        let request: RecognitionRequest = serde_json::from_slice(body)
            .map_err(|e| RecognitionError::BadRequest(e.to_string()))?;
        request.validate()?;

        let lang = match request.lang.as_deref() {
            Some(code) => code.parse()?,
            None => Lang::default(),
        };
        let image = JpegImage::from_base64(&request.image)?;

        Ok((image, lang))
    }

    #[tracing::instrument(skip(self, image), fields(image_bytes = image.byte_len(), provider = self.provider.name()))]
    pub async fn recognize(
        &self,
        image: &JpegImage,
        lang: Lang,
    ) -> Result<Recognition, RecognitionError> {
        self.provider.health_check().await?;

        let _permit = self
            .limiter
            .clone()
            .try_acquire_owned()
            .map_err(|_| RecognitionError::Busy)?;

        let prompt = build_prompt(lang);
        let params = GenerationParams { json_output: true };

        let provider_name = self.provider.name();
        let model = self.provider.model().to_string();
        let started = Instant::now();

        let outcome =
            tokio::time::timeout(self.timeout, self.provider.generate(&prompt, image, &params))
                .await;

        metrics::record_provider_latency(provider_name, &model, started.elapsed().as_secs_f64());

        let response = match outcome {
            Err(_) => {
                metrics::record_provider_error(provider_name, "timeout");
                return Err(RecognitionError::Timeout(self.timeout));
            }
            Ok(Err(e)) => {
                metrics::record_provider_error(provider_name, e.error_type());
                return Err(e.into());
            }
            Ok(Ok(response)) => response,
        };

        metrics::record_tokens(&model, response.input_tokens, response.output_tokens);

        tracing::debug!(
            model = %model,
            finish_reason = response.finish_reason.as_str(),
            output_len = response.text.len(),
            "Provider responded"
        );

        let (body, description) = parse_model_output(&response.text)?;

        Ok(Recognition { body, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockVisionProvider;
    use crate::services::providers::ProviderError;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    const REPLY: &str = "```json\n{\"name_kz\":\"Қошқар мүйіз\",\"name_ru\":\"Бараний рог\",\"usage\":\"Сырмақ\"}\n```";

    fn jpeg() -> JpegImage {
        JpegImage::from_base64(&STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00])).unwrap()
    }

    fn service(provider: MockVisionProvider) -> (RecognitionService, Arc<MockVisionProvider>) {
        let provider = Arc::new(provider);
        let service = RecognitionService::new(provider.clone(), 2, Duration::from_secs(5));
        (service, provider)
    }

    #[test]
    fn strip_removes_json_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"a\":\"b\"}\n```"),
            "{\"a\":\"b\"}"
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let inputs = [
            "```json\n{}\n```",
            "``````json```",
            "``` ```json `",
            "plain text",
            "````json``",
            "``````jsonjson",
            "```jso```n",
            "`````json",
            "``json`json``",
            "",
        ];
        for input in inputs {
            let once = strip_code_fences(input);
            assert_eq!(strip_code_fences(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn prompt_lists_every_field_and_language() {
        let prompt = build_prompt(Lang::Ru);
        for field in OrnamentDescription::FIELDS {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.ends_with("Write the \"usage\" field in Russian."));
    }

    #[test]
    fn output_body_is_returned_without_fences() {
        let (body, description) = parse_model_output(REPLY).unwrap();
        assert!(body.starts_with('{') && body.ends_with('}'));
        assert_eq!(description.name_kz.as_deref(), Some("Қошқар мүйіз"));
    }

    #[test]
    fn prose_around_object_is_dropped() {
        let (body, _) =
            parse_model_output("Here is the result: {\"name_en\":\"Ram's horn\"} Hope it helps.")
                .unwrap();
        assert_eq!(body, "{\"name_en\":\"Ram's horn\"}");
    }

    #[test]
    fn prose_without_a_whole_object_is_rejected() {
        let err = parse_model_output("The result is } then { it ends").unwrap_err();
        assert_eq!(err.kind(), "invalid_output");

        let err = parse_model_output("Two: {\"name_en\":\"a\"} and {\"name_en\":\"b\"}").unwrap_err();
        assert_eq!(err.kind(), "invalid_output");
    }

    #[test]
    fn non_json_output_is_rejected() {
        let err = parse_model_output("I cannot identify this ornament.").unwrap_err();
        assert_eq!(err.kind(), "invalid_output");
    }

    #[test]
    fn arrays_and_wrong_field_types_are_rejected() {
        assert!(parse_model_output("[\"name_kz\"]").is_err());
        let err = parse_model_output("{\"name_kz\": 42}").unwrap_err();
        assert!(err.to_string().contains("name_kz"));
    }

    #[test]
    fn nameless_output_is_rejected() {
        let err = parse_model_output("{\"usage\":\"Carpets\",\"name_kz\":null}").unwrap_err();
        assert_eq!(err.kind(), "invalid_output");
    }

    #[test]
    fn parse_request_defaults_language() {
        let body = format!("{{\"image\":\"{}\"}}", jpeg().as_base64());
        let (_, lang) = RecognitionService::parse_request(body.as_bytes()).unwrap();
        assert_eq!(lang, Lang::Kz);
    }

    #[test]
    fn parse_request_rejects_missing_image_and_unknown_lang() {
        let err = RecognitionService::parse_request(br#"{"lang":"kz"}"#).unwrap_err();
        assert!(err.to_string().contains("image"));

        let body = format!("{{\"image\":\"{}\",\"lang\":\"de\"}}", jpeg().as_base64());
        let err = RecognitionService::parse_request(body.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "bad_request");

        let err = RecognitionService::parse_request(b"").unwrap_err();
        assert_eq!(err.kind(), "bad_request");
    }

    #[tokio::test]
    async fn recognize_sends_language_specific_prompt() {
        let (service, provider) = service(MockVisionProvider::replying(REPLY));
        let recognition = service.recognize(&jpeg(), Lang::En).await.unwrap();

        assert_eq!(recognition.description.name(Lang::En), Some("Қошқар мүйіз"));
        assert_eq!(provider.calls(), 1);
        assert!(provider.last_prompt().unwrap().contains("in English"));
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let (service, provider) = service(MockVisionProvider::failing(ProviderError::RateLimited));
        let err = service.recognize(&jpeg(), Lang::Kz).await.unwrap_err();

        assert_eq!(err.kind(), "provider");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn unconfigured_provider_is_never_called() {
        let (service, provider) = service(MockVisionProvider::unconfigured());
        let err = service.recognize(&jpeg(), Lang::Kz).await.unwrap_err();

        assert_eq!(err.kind(), "not_configured");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = Arc::new(MockVisionProvider::delayed(Duration::from_secs(30), REPLY));
        let service = RecognitionService::new(provider, 1, Duration::from_millis(50));

        let started = Instant::now();
        let err = service.recognize(&jpeg(), Lang::Kz).await.unwrap_err();

        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.to_string(), "Recognition timed out after 50ms");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn oversized_concurrency_is_clamped() {
        let provider = Arc::new(MockVisionProvider::replying(REPLY));
        let service = RecognitionService::new(provider, usize::MAX / 2, Duration::from_secs(1));
        assert_eq!(
            service.limiter.available_permits(),
            Semaphore::MAX_PERMITS
        );
    }

    #[tokio::test]
    async fn saturated_service_reports_busy() {
        let provider = Arc::new(MockVisionProvider::delayed(Duration::from_millis(500), REPLY));
        let service = Arc::new(RecognitionService::new(provider, 1, Duration::from_secs(5)));

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.recognize(&jpeg(), Lang::Kz).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = service.recognize(&jpeg(), Lang::Kz).await.unwrap_err();
        assert_eq!(err.kind(), "busy");
        assert!(first.await.unwrap().is_ok());
    }
}
