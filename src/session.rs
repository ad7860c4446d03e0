//! One editing interaction: pick photos, dispatch, look at the result, save.
//!
//! ```text
//! Idle -> InputsSelected -> Dispatched -> Succeeded -> Saved
//!                 ^                   \-> Failed
//!                 \-------------------------/
//! ```
//!
//! Every dispatch hands out a [`DispatchTicket`]. Outcomes are matched back
//! against the ticket, so a reply for a cancelled request or another session
//! is dropped instead of overwriting newer state.

use uuid::Uuid;

use crate::builder::RequestBuilder;
use crate::error::{MemoraError, Result};
use crate::models::{
    Capability, GenerationRequest, GenerationResult, ImageInput, QualityTier, ResultKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InputsSelected,
    Dispatched { request_id: u64 },
    Succeeded(GenerationResult),
    Failed { message: String, retryable: bool },
    Saved { artifact_id: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::InputsSelected => "inputs selected",
            SessionState::Dispatched { .. } => "dispatched",
            SessionState::Succeeded(_) => "succeeded",
            SessionState::Failed { .. } => "failed",
            SessionState::Saved { .. } => "saved",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchTicket {
    pub session_id: Uuid,
    pub request_id: u64,
    pub request: GenerationRequest,
}

/// A finished request, still tagged with the ticket that produced it.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub session_id: Uuid,
    pub request_id: u64,
    pub result: Result<GenerationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeDisposition {
    Applied,
    Discarded,
}

#[derive(Debug)]
pub struct EditorSession {
    id: Uuid,
    capability: &'static Capability,
    inputs: Vec<ImageInput>,
    instruction: String,
    quality: QualityTier,
    state: SessionState,
    next_request_id: u64,
}

impl EditorSession {
    pub fn new(capability: &'static Capability) -> Self {
        Self {
            id: Uuid::new_v4(),
            capability,
            inputs: Vec::new(),
            instruction: String::new(),
            quality: QualityTier::default(),
            state: SessionState::Idle,
            next_request_id: 1,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn inputs(&self) -> &[ImageInput] {
        &self.inputs
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match &self.state {
            SessionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self.state, SessionState::Dispatched { .. })
    }

    /// Adds photos, keeping at most the capability's maximum. Returns how
    /// many were accepted.
    pub fn add_inputs(&mut self, images: impl IntoIterator<Item = ImageInput>) -> Result<usize> {
        self.ensure_editable("add photos")?;
        let room = self.capability.max_inputs.saturating_sub(self.inputs.len());
        let before = self.inputs.len();
        self.inputs.extend(images.into_iter().take(room));
        let accepted = self.inputs.len() - before;
        self.refresh_input_state();
        Ok(accepted)
    }

    pub fn remove_input(&mut self, index: usize) -> Result<Option<ImageInput>> {
        self.ensure_editable("remove photos")?;
        if index >= self.inputs.len() {
            return Ok(None);
        }
        let removed = self.inputs.remove(index);
        self.refresh_input_state();
        Ok(Some(removed))
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    pub fn set_quality(&mut self, quality: QualityTier) {
        self.quality = quality;
    }

    /// Photos still needed before a dispatch is allowed.
    pub fn missing_inputs(&self) -> usize {
        self.capability.min_inputs.saturating_sub(self.inputs.len())
    }

    /// A one-line hint describing what the user should do next.
    pub fn status_message(&self) -> String {
        match &self.state {
            SessionState::Succeeded(_) => "Result ready! Save it if you like it.".to_string(),
            SessionState::Saved { .. } => "Saved to the gallery.".to_string(),
            SessionState::Failed { message, .. } => message.clone(),
            SessionState::Dispatched { .. } if self.capability.output == ResultKind::Text => {
                "The AI is thinking deeply...".to_string()
            }
            SessionState::Dispatched { .. } => "The AI is working its magic...".to_string(),
            SessionState::Idle => "Upload a photo to get started.".to_string(),
            SessionState::InputsSelected => match self.missing_inputs() {
                0 => "Photos ready. Start the process.".to_string(),
                missing => format!("Add {} more photo(s) to continue.", missing),
            },
        }
    }

    /// Validates the inputs and moves to `Dispatched`. Validation failures
    /// leave the session and its request counter untouched.
    pub fn begin_dispatch(&mut self) -> Result<DispatchTicket> {
        match self.state {
            SessionState::Dispatched { .. } => return Err(MemoraError::SessionBusy),
            SessionState::Succeeded(_) | SessionState::Saved { .. } => {
                return Err(MemoraError::InvalidTransition {
                    from: self.state.name(),
                    action: "dispatch",
                })
            }
            _ => {}
        }

        let request = RequestBuilder::build(
            self.capability,
            self.inputs.clone(),
            Some(self.instruction.as_str()),
            Some(self.quality),
        )?;

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.state = SessionState::Dispatched { request_id };
        log::info!(
            "Session {} dispatched request #{} for {}",
            self.id,
            request_id,
            self.capability.id
        );

        Ok(DispatchTicket {
            session_id: self.id,
            request_id,
            request,
        })
    }

    pub fn complete(&mut self, outcome: GenerationOutcome) -> OutcomeDisposition {
        let pending = match self.state {
            SessionState::Dispatched { request_id } => Some(request_id),
            _ => None,
        };
        if outcome.session_id != self.id || pending != Some(outcome.request_id) {
            log::debug!(
                "Discarding stale outcome for session {} request #{}",
                outcome.session_id,
                outcome.request_id
            );
            return OutcomeDisposition::Discarded;
        }

        self.state = match outcome.result {
            Ok(result) => SessionState::Succeeded(result),
            Err(e) => {
                log::warn!("Session {} request failed: {}", self.id, e);
                SessionState::Failed {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                }
            }
        };
        OutcomeDisposition::Applied
    }

    /// Forgets the outstanding request; its outcome will be discarded.
    pub fn cancel_pending(&mut self) {
        if self.is_dispatched() {
            log::debug!("Session {} cancelled its pending request", self.id);
            self.refresh_input_state();
        }
    }

    /// Leaves a result or error behind and returns to the selected photos.
    pub fn clear_result(&mut self) -> Result<()> {
        match self.state {
            SessionState::Succeeded(_)
            | SessionState::Saved { .. }
            | SessionState::Failed { .. } => {
                self.refresh_input_state();
                Ok(())
            }
            SessionState::Dispatched { .. } => Err(MemoraError::SessionBusy),
            _ => Ok(()),
        }
    }

    pub fn mark_saved(&mut self, artifact_id: impl Into<String>) -> Result<()> {
        match self.state {
            SessionState::Succeeded(_) => {
                self.state = SessionState::Saved {
                    artifact_id: artifact_id.into(),
                };
                Ok(())
            }
            _ => Err(MemoraError::InvalidTransition {
                from: self.state.name(),
                action: "save",
            }),
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<()> {
        match self.state {
            SessionState::Dispatched { .. } => Err(MemoraError::SessionBusy),
            SessionState::Succeeded(_) | SessionState::Saved { .. } => {
                Err(MemoraError::InvalidTransition {
                    from: self.state.name(),
                    action,
                })
            }
            _ => Ok(()),
        }
    }

    fn refresh_input_state(&mut self) {
        self.state = if self.inputs.is_empty() {
            SessionState::Idle
        } else {
            SessionState::InputsSelected
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CapabilityId;
    use crate::registry::capability;

    fn photo(tag: u8) -> ImageInput {
        ImageInput::new("image/png", vec![tag])
    }

    fn image_result() -> GenerationResult {
        GenerationResult::Image {
            mime_type: "image/png".into(),
            data: "AQID".into(),
        }
    }

    fn outcome(ticket: &DispatchTicket, result: Result<GenerationResult>) -> GenerationOutcome {
        GenerationOutcome {
            session_id: ticket.session_id,
            request_id: ticket.request_id,
            result,
        }
    }

    #[test]
    fn test_inputs_truncate_at_max() {
        let mut session = EditorSession::new(capability(CapabilityId::FutureChild));
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.add_inputs(vec![photo(1), photo(2), photo(3)]).unwrap(), 2);
        assert_eq!(session.inputs().len(), 2);
        assert_eq!(session.state(), &SessionState::InputsSelected);

        session.remove_input(0).unwrap();
        session.remove_input(0).unwrap();
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_validation_does_not_consume_a_request_id() {
        let mut session = EditorSession::new(capability(CapabilityId::FutureChild));
        session.add_inputs(vec![photo(1)]).unwrap();
        assert_eq!(session.missing_inputs(), 1);
        assert!(matches!(
            session.begin_dispatch(),
            Err(MemoraError::InsufficientInputs { .. })
        ));
        assert_eq!(session.state(), &SessionState::InputsSelected);

        session.add_inputs(vec![photo(2)]).unwrap();
        let ticket = session.begin_dispatch().unwrap();
        assert_eq!(ticket.request_id, 1);
    }

    #[test]
    fn test_second_dispatch_is_rejected() {
        let mut session = EditorSession::new(capability(CapabilityId::Restore));
        session.add_inputs(vec![photo(1)]).unwrap();
        session.begin_dispatch().unwrap();
        assert!(matches!(session.begin_dispatch(), Err(MemoraError::SessionBusy)));
        assert!(matches!(
            session.add_inputs(vec![photo(2)]),
            Err(MemoraError::SessionBusy)
        ));
    }

    #[test]
    fn test_success_then_save() {
        let mut session = EditorSession::new(capability(CapabilityId::Restore));
        session.add_inputs(vec![photo(1)]).unwrap();
        let ticket = session.begin_dispatch().unwrap();

        let disposition = session.complete(outcome(&ticket, Ok(image_result())));
        assert_eq!(disposition, OutcomeDisposition::Applied);
        assert_eq!(session.result(), Some(&image_result()));

        session.mark_saved("42").unwrap();
        assert_eq!(
            session.state(),
            &SessionState::Saved {
                artifact_id: "42".into()
            }
        );
        assert!(session.mark_saved("43").is_err());
    }

    #[test]
    fn test_failure_keeps_inputs_and_allows_retry() {
        let mut session = EditorSession::new(capability(CapabilityId::Enhance));
        session.add_inputs(vec![photo(7)]).unwrap();
        session.set_instruction("brighter");
        let ticket = session.begin_dispatch().unwrap();

        session.complete(outcome(&ticket, Err(MemoraError::NoImageInResponse)));
        match session.state() {
            SessionState::Failed { retryable, message } => {
                assert!(*retryable);
                assert_eq!(message, &MemoraError::NoImageInResponse.to_string());
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(session.inputs(), &[photo(7)]);

        let retry = session.begin_dispatch().unwrap();
        assert_eq!(retry.request_id, 2);
        assert_eq!(
            retry.request.user_instruction.as_deref(),
            Some("brighter")
        );
    }

    #[test]
    fn test_cancelled_outcome_is_discarded() {
        let mut session = EditorSession::new(capability(CapabilityId::TimeBridge));
        session.add_inputs(vec![photo(1)]).unwrap();
        let first = session.begin_dispatch().unwrap();
        session.cancel_pending();
        assert_eq!(session.state(), &SessionState::InputsSelected);

        let second = session.begin_dispatch().unwrap();
        assert_eq!(
            session.complete(outcome(&first, Ok(image_result()))),
            OutcomeDisposition::Discarded
        );
        assert!(session.is_dispatched());
        assert_eq!(
            session.complete(outcome(&second, Ok(image_result()))),
            OutcomeDisposition::Applied
        );
    }

    #[test]
    fn test_outcome_from_other_session_is_discarded() {
        let cap = capability(CapabilityId::Restore);
        let mut old = EditorSession::new(cap);
        old.add_inputs(vec![photo(1)]).unwrap();
        let stale = old.begin_dispatch().unwrap();

        let mut current = EditorSession::new(cap);
        current.add_inputs(vec![photo(2)]).unwrap();
        current.begin_dispatch().unwrap();

        assert_eq!(
            current.complete(outcome(&stale, Ok(image_result()))),
            OutcomeDisposition::Discarded
        );
        assert!(current.is_dispatched());
    }

    #[test]
    fn test_clear_result_returns_to_inputs() {
        let mut session = EditorSession::new(capability(CapabilityId::Analyze));
        session.add_inputs(vec![photo(1)]).unwrap();
        let ticket = session.begin_dispatch().unwrap();
        assert_eq!(session.status_message(), "The AI is thinking deeply...");
        session.complete(outcome(
            &ticket,
            Ok(GenerationResult::Text {
                text: "calm".into(),
            }),
        ));
        assert!(session.begin_dispatch().is_err());

        session.clear_result().unwrap();
        assert_eq!(session.state(), &SessionState::InputsSelected);
        assert_eq!(session.status_message(), "Photos ready. Start the process.");
    }

    #[test]
    fn test_status_counts_missing_photos() {
        let mut session = EditorSession::new(capability(CapabilityId::FutureChild));
        assert_eq!(session.status_message(), "Upload a photo to get started.");
        session.add_inputs(vec![photo(1)]).unwrap();
        assert_eq!(session.status_message(), "Add 1 more photo(s) to continue.");
    }
}
