use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MemoraError, Result};
use crate::models::capability::{CapabilityId, ResultKind};

/// Accepts what the service may send: any padding and non-zero trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A normalized reply: exactly one image or one text payload.
///
/// Image data stays in the base64 text the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GenerationResult {
    Image {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
    Text {
        text: String,
    },
}

impl GenerationResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            GenerationResult::Image { .. } => ResultKind::Image,
            GenerationResult::Text { .. } => ResultKind::Text,
        }
    }

    /// `data:<mime>;base64,<data>` for images, `None` for text.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            GenerationResult::Image { mime_type, data } => {
                Some(format!("data:{};base64,{}", mime_type, data))
            }
            GenerationResult::Text { .. } => None,
        }
    }

    /// Raw image bytes, decoded on demand. `None` for text.
    pub fn image_bytes(&self) -> Option<Result<Vec<u8>>> {
        match self {
            GenerationResult::Image { data, .. } => {
                let compact: String = data.split_ascii_whitespace().collect();
                Some(LENIENT.decode(compact.as_bytes()).map_err(|e| {
                    MemoraError::ResponseError(format!("Image base64 decode failed: {}", e))
                }))
            }
            GenerationResult::Text { .. } => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            GenerationResult::Text { text } => Some(text),
            GenerationResult::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedArtifact {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub capability: CapabilityId,
    pub prompt: String,
    pub result: GenerationResult,
}
