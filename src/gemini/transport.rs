use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::GeminiConfig,
    error::{MemoraError, Result},
    models::{GenerateContentRequest, GenerateContentResponse},
};

/// Executes one `generateContent` call. Swappable so callers and tests can
/// run without the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

pub struct HttpTransport {
    client: Client,
    api_key: String,
    api_base: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                MemoraError::ConfigError(
                    "GEMINI_API_KEY (or GOOGLE_API_KEY) is required".into(),
                )
            })?;

        let client = Client::builder()
            .build()
            .map_err(|e| MemoraError::ConfigError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base().to_string(),
            timeout: config.request_timeout(),
        })
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let endpoint = self.endpoint_for_model(model);
        log::debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MemoraError::Timeout(self.timeout)
                } else {
                    MemoraError::TransportFailure(format!("Gemini request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {} for model {}: {}", status, model, body);
            return Err(MemoraError::TransportFailure(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| MemoraError::ResponseError(format!("Invalid Gemini response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let err = HttpTransport::new(&GeminiConfig::new()).err().unwrap();
        assert!(matches!(err, MemoraError::ConfigError(_)));

        let blank = GeminiConfig::new().with_api_key("  ");
        assert!(HttpTransport::new(&blank).is_err());
    }

    #[test]
    fn test_endpoint_for_model() {
        let config = GeminiConfig::new()
            .with_api_key("k")
            .with_api_base("http://x/v1beta/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.endpoint_for_model("gemini-2.5-flash-image"),
            "http://x/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        assert_eq!(
            transport.endpoint_for_model("models/gemini-3-pro-preview"),
            "http://x/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }
}
