use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoraError {
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("{}", describe_input_count(capability, *min, *max, *provided))]
    InsufficientInputs {
        capability: String,
        min: usize,
        max: usize,
        provided: usize,
    },

    #[error("The AI response did not contain an image. Please try again.")]
    NoImageInResponse,

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    TransportFailure(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("A request is already in progress for this session")]
    SessionBusy,

    #[error("Cannot {action} while the session is {from}")]
    InvalidTransition { from: &'static str, action: &'static str },

    #[error("Artifact {0} already exists in the gallery")]
    DuplicateArtifact(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemoraError {
    /// Whether the user can simply try the same request again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MemoraError::NoImageInResponse
                | MemoraError::Timeout(_)
                | MemoraError::TransportFailure(_)
                | MemoraError::ResponseError(_)
        )
    }
}

fn describe_input_count(capability: &str, min: usize, max: usize, provided: usize) -> String {
    if provided < min {
        let missing = min - provided;
        format!(
            "{} needs at least {} photo(s): add {} more",
            capability, min, missing
        )
    } else {
        format!(
            "{} accepts at most {} photo(s): remove {}",
            capability,
            max,
            provided.saturating_sub(max)
        )
    }
}

pub type Result<T> = std::result::Result<T, MemoraError>;
