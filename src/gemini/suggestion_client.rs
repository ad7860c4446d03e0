use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::MemoraError,
    gemini::transport::Transport,
    models::{Content, GenerateContentRequest, Part},
};

/// Best-effort title suggestions from the lightweight text model.
#[derive(Clone)]
pub struct SuggestionClient {
    transport: Arc<dyn Transport>,
    model: String,
    timeout: Duration,
}

impl SuggestionClient {
    pub fn new(transport: Arc<dyn Transport>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            model: model.into(),
            timeout,
        }
    }

    /// Never fails: any error yields an empty string.
    pub async fn fast_suggestion(&self, description: &str) -> String {
        match self.request_title(description).await {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Suggestion unavailable: {}", e);
                String::new()
            }
        }
    }

    async fn request_title(&self, description: &str) -> Result<String, MemoraError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(format!(
                    "Provide a very short, catchy title (max 5 words) for a photo based on this description: {}",
                    description
                ))],
            }],
            generation_config: None,
        };

        let response = tokio::time::timeout(
            self.timeout,
            self.transport.generate_content(&self.model, &request),
        )
        .await
        .map_err(|_| MemoraError::Timeout(self.timeout))??;

        Ok(clean_title(&response.text().unwrap_or_default()))
    }
}

fn clean_title(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}
