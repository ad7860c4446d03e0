use std::env;
use std::time::Duration;

use crate::models::ModelTier;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_SUGGESTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Model names backing each [`ModelTier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    pub fast_image: String,
    pub high_quality_image: String,
    pub deep_reasoning: String,
    pub fast_text: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        ModelCatalog {
            fast_image: "gemini-2.5-flash-image".to_string(),
            high_quality_image: "gemini-3-pro-image-preview".to_string(),
            deep_reasoning: "gemini-3-pro-preview".to_string(),
            fast_text: "gemini-2.5-flash-lite".to_string(),
        }
    }
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        ModelCatalog {
            fast_image: env::var("MEMORA_MODEL_FAST_IMAGE").unwrap_or(defaults.fast_image),
            high_quality_image: env::var("MEMORA_MODEL_PRO_IMAGE")
                .unwrap_or(defaults.high_quality_image),
            deep_reasoning: env::var("MEMORA_MODEL_THINKING").unwrap_or(defaults.deep_reasoning),
            fast_text: env::var("MEMORA_MODEL_FAST_TEXT").unwrap_or(defaults.fast_text),
        }
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::FastImage => &self.fast_image,
            ModelTier::HighQualityImage => &self.high_quality_image,
            ModelTier::DeepReasoning => &self.deep_reasoning,
            ModelTier::FastText => &self.fast_text,
        }
    }

    pub fn with_model(mut self, tier: ModelTier, model: impl Into<String>) -> Self {
        let model = model.into();
        match tier {
            ModelTier::FastImage => self.fast_image = model,
            ModelTier::HighQualityImage => self.high_quality_image = model,
            ModelTier::DeepReasoning => self.deep_reasoning = model,
            ModelTier::FastText => self.fast_text = model,
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub request_timeout: Option<Duration>,
    pub suggestion_timeout: Option<Duration>,
    pub models: ModelCatalog,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: None,
            request_timeout: None,
            suggestion_timeout: None,
            models: ModelCatalog::default(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY"));
        let api_base = non_empty_env("GEMINI_API_BASE");
        let request_timeout = seconds_env("MEMORA_REQUEST_TIMEOUT_SECS");
        let suggestion_timeout = seconds_env("MEMORA_SUGGESTION_TIMEOUT_SECS");

        GeminiConfig {
            api_key,
            api_base,
            request_timeout,
            suggestion_timeout,
            models: ModelCatalog::from_env(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_suggestion_timeout(mut self, timeout: Duration) -> Self {
        self.suggestion_timeout = Some(timeout);
        self
    }

    pub fn with_models(mut self, models: ModelCatalog) -> Self {
        self.models = models;
        self
    }

    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .unwrap_or(DEFAULT_API_BASE)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        self.suggestion_timeout.unwrap_or(DEFAULT_SUGGESTION_TIMEOUT)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn seconds_env(key: &str) -> Option<Duration> {
    non_empty_env(key)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::new();
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.request_timeout(), Duration::from_secs(90));
        assert_eq!(config.suggestion_timeout(), Duration::from_secs(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GeminiConfig::new()
            .with_api_key("key")
            .with_api_base("http://localhost:8080/v1beta/")
            .with_request_timeout(Duration::from_secs(5))
            .with_models(ModelCatalog::new().with_model(ModelTier::FastText, "tiny"));

        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.api_base(), "http://localhost:8080/v1beta");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.models.model_for(ModelTier::FastText), "tiny");
        assert_eq!(
            config.models.model_for(ModelTier::DeepReasoning),
            "gemini-3-pro-preview"
        );
    }
}
