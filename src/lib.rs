//! Memora: AI photo transformations on top of the Gemini API.
//!
//! Pick a capability from the [`registry`], collect photos in an
//! [`EditorSession`], dispatch it through a [`GeminiClient`] and keep the
//! results you like in the [`SessionGallery`].

pub mod app;
pub mod builder;
pub mod config;
pub mod error;
pub mod gemini;
pub mod interpreter;
pub mod logger;
pub mod models;
pub mod registry;
pub mod session;
pub mod storage;

pub use app::{AppState, View};
pub use builder::RequestBuilder;
pub use config::{GeminiConfig, ModelCatalog};
pub use error::{MemoraError, Result};
pub use gemini::{GeminiClient, GenerationClient, HttpTransport, SuggestionClient, Transport};
pub use interpreter::interpret;
pub use models::*;
pub use session::{
    DispatchTicket, EditorSession, GenerationOutcome, OutcomeDisposition, SessionState,
};
pub use storage::SessionGallery;
