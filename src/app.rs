//! View routing for one user: which screen is showing, the editor session
//! (if any) and the gallery. Each tab or window owns its own `AppState`.

use crate::error::{MemoraError, Result};
use crate::models::CapabilityId;
use crate::registry;
use crate::session::{EditorSession, GenerationOutcome, OutcomeDisposition, SessionState};
use crate::storage::SessionGallery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Gallery,
    Profile,
    Editor,
}

#[derive(Debug)]
pub struct AppState {
    view: View,
    session: Option<EditorSession>,
    gallery: SessionGallery,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Home,
            session: None,
            gallery: SessionGallery::new(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditorSession> {
        self.session.as_mut()
    }

    pub fn gallery(&self) -> &SessionGallery {
        &self.gallery
    }

    /// Opens a fresh editor for `id`, replacing any previous session.
    pub fn select_capability(&mut self, id: CapabilityId) -> &mut EditorSession {
        let session = EditorSession::new(registry::capability(id));
        log::info!("Opened {} editor (session {})", id, session.id());
        self.view = View::Editor;
        self.session.insert(session)
    }

    /// Leaves the editor. Any request still in flight belongs to the dropped
    /// session, so its outcome will be discarded.
    pub fn back(&mut self) {
        if let Some(session) = self.session.take() {
            if session.is_dispatched() {
                log::debug!("Leaving session {} with a request in flight", session.id());
            }
        }
        self.view = View::Home;
    }

    /// Bottom-navigation routing. The editor cannot be shown without a session.
    pub fn navigate(&mut self, view: View) -> View {
        self.view = match view {
            View::Editor if self.session.is_none() => View::Home,
            other => other,
        };
        self.view
    }

    pub fn apply_outcome(&mut self, outcome: GenerationOutcome) -> OutcomeDisposition {
        match self.session.as_mut() {
            Some(session) => session.complete(outcome),
            None => {
                log::debug!(
                    "Discarding outcome for closed session {}",
                    outcome.session_id
                );
                OutcomeDisposition::Discarded
            }
        }
    }

    /// Stores the current result in the gallery and shows the gallery.
    pub fn save_result(&mut self) -> Result<String> {
        let session = self.session.as_mut().ok_or(MemoraError::InvalidTransition {
            from: "closed",
            action: "save",
        })?;
        let result = match session.state() {
            SessionState::Succeeded(result) => result.clone(),
            other => {
                return Err(MemoraError::InvalidTransition {
                    from: other.name(),
                    action: "save",
                })
            }
        };

        let artifact_id = self
            .gallery
            .save(session.capability().id, session.instruction(), result)
            .id
            .clone();
        session.mark_saved(artifact_id.clone())?;
        self.view = View::Gallery;
        Ok(artifact_id)
    }

    pub fn delete_artifact(&mut self, id: &str) {
        if self.gallery.remove(id).is_some() {
            log::info!("Deleted artifact {}", id);
        }
    }
}
