use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::ModelCatalog,
    error::{MemoraError, Result},
    gemini::transport::Transport,
    interpreter::interpret,
    logger,
    models::{GenerationRequest, GenerationResult},
    session::{DispatchTicket, GenerationOutcome},
};

#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn Transport>,
    models: ModelCatalog,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn Transport>, models: ModelCatalog, timeout: Duration) -> Self {
        Self {
            transport,
            models,
            timeout,
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let model = self.models.model_for(request.model);
        let payload = request.to_wire();

        log::info!(
            "Generating {} with model: {} ({} image(s))",
            request.capability,
            model,
            request.images.len()
        );
        let _timer = logger::timer(&format!("{} via {}", request.capability, model))
            .with_context("capability", serde_json::json!(request.capability))
            .with_context("model", serde_json::json!(model))
            .with_context("images", serde_json::json!(request.images.len()));

        let response = tokio::time::timeout(
            self.timeout,
            self.transport.generate_content(model, &payload),
        )
        .await
        .map_err(|_| {
            log::error!("{} timed out after {:?}", request.capability, self.timeout);
            MemoraError::Timeout(self.timeout)
        })??;

        interpret(&response, request.expects)
    }

    /// Runs the ticket's request and tags the result with the ticket.
    pub async fn dispatch(&self, ticket: DispatchTicket) -> GenerationOutcome {
        let result = self.generate(&ticket.request).await;
        GenerationOutcome {
            session_id: ticket.session_id,
            request_id: ticket.request_id,
            result,
        }
    }
}
