pub mod generation_client;
pub mod suggestion_client;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

use std::sync::Arc;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::ModelTier,
    session::{EditorSession, OutcomeDisposition},
};

pub use generation_client::GenerationClient;
pub use suggestion_client::SuggestionClient;
pub use transport::{HttpTransport, Transport};

#[derive(Clone)]
pub struct GeminiClient {
    generation_client: GenerationClient,
    suggestion_client: SuggestionClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        log::info!("Gemini client ready ({})", config.api_base());
        Ok(Self::with_transport(Arc::new(transport), &config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &GeminiConfig) -> Self {
        Self {
            generation_client: GenerationClient::new(
                transport.clone(),
                config.models.clone(),
                config.request_timeout(),
            ),
            suggestion_client: SuggestionClient::new(
                transport,
                config.models.model_for(ModelTier::FastText),
                config.suggestion_timeout(),
            ),
        }
    }

    pub fn generation(&self) -> &GenerationClient {
        &self.generation_client
    }

    pub fn suggestion(&self) -> &SuggestionClient {
        &self.suggestion_client
    }

    /// Dispatches the session's current inputs and applies the outcome.
    /// Errors here are dispatch refusals (validation, busy); generation
    /// failures land in the session's `Failed` state instead.
    pub async fn run(&self, session: &mut EditorSession) -> Result<OutcomeDisposition> {
        let ticket = session.begin_dispatch()?;
        let outcome = self.generation_client.dispatch(ticket).await;
        Ok(session.complete(outcome))
    }
}
