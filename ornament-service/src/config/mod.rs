use crate::services::providers::gemini::GEMINI_API_BASE;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default provider call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of concurrent provider calls.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default request body limit (10 MiB) - room for a base64 photo.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct OrnamentConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub recognition: RecognitionSettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Empty when unset; recognition then fails with `not_configured`.
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Sampling temperature; the model default when unset.
    pub temperature: Option<f32>,
    /// Output token cap; the model default when unset.
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct RecognitionSettings {
    pub max_concurrent: usize,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            gemini: GeminiSettings {
                api_key: Secret::new(String::new()),
                model: "gemini-2.0-flash".to_string(),
                api_base: GEMINI_API_BASE.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                temperature: None,
                max_output_tokens: None,
            },
            recognition: RecognitionSettings {
                max_concurrent: DEFAULT_MAX_CONCURRENT,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            observability: ObservabilitySettings {
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
        }
    }
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OrnamentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let defaults = OrnamentConfig::default();
        let api_key = get_env("GEMINI_API_KEY", Some(""), is_prod)?;

        let config = OrnamentConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get_env("GEMINI_MODEL", Some(&defaults.gemini.model), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(&defaults.gemini.api_base), is_prod)?,
                timeout_secs: parse_env(
                    "GEMINI_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                    is_prod,
                )?,
                temperature: parse_optional_env("GEMINI_TEMPERATURE")?,
                max_output_tokens: parse_optional_env("GEMINI_MAX_OUTPUT_TOKENS")?,
            },
            recognition: RecognitionSettings {
                max_concurrent: parse_env(
                    "RECOGNITION_MAX_CONCURRENT",
                    DEFAULT_MAX_CONCURRENT,
                    is_prod,
                )?,
                max_body_bytes: parse_env(
                    "RECOGNITION_MAX_BODY_BYTES",
                    DEFAULT_MAX_BODY_BYTES,
                    is_prod,
                )?,
            },
            observability: ObservabilitySettings {
                log_level: get_env(
                    "LOG_LEVEL",
                    Some(&defaults.observability.log_level),
                    is_prod,
                )?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the recognition pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        let invalid =
            |msg: String| -> Result<(), AppError> { Err(AppError::ConfigError(anyhow::anyhow!(msg))) };

        if self.gemini.timeout_secs == 0 {
            return invalid("GEMINI_TIMEOUT_SECS must be at least 1".to_string());
        }
        if !(1..=Semaphore::MAX_PERMITS).contains(&self.recognition.max_concurrent) {
            return invalid(format!(
                "RECOGNITION_MAX_CONCURRENT must be between 1 and {}",
                Semaphore::MAX_PERMITS
            ));
        }
        if self.recognition.max_body_bytes == 0 {
            return invalid("RECOGNITION_MAX_BODY_BYTES must be at least 1".to_string());
        }
        if let Some(t) = self.gemini.temperature {
            if !(0.0..=2.0).contains(&t) {
                return invalid("GEMINI_TEMPERATURE must be between 0.0 and 2.0".to_string());
            }
        }
        if let Some(n) = self.gemini.max_output_tokens {
            if n < 1 {
                return invalid("GEMINI_MAX_OUTPUT_TOKENS must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod && default.map_or(true, str::is_empty) {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(&default.to_string()), is_prod)?
        .trim()
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}

/// Unset or blank means "use the provider default".
fn parse_optional_env<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e))),
        _ => Ok(None),
    }
}
