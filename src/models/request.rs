use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{MemoraError, Result};
use crate::models::capability::{CapabilityId, ModelTier, QualityTier, ResultKind};
use crate::models::gemini::{
    Content, GenerateContentRequest, GenerationConfig, ImageConfig, Part, ThinkingConfig,
};

/// Thinking budget sent when a request asks for maximum reasoning depth.
pub const MAX_THINKING_BUDGET: u32 = 32768;

/// A decoded photo supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageInput {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_type_for_path(path).ok_or_else(|| {
            MemoraError::ConfigError(format!("Unsupported image type: {}", path.display()))
        })?;
        let data = fs::read(path)?;
        Ok(Self::new(mime_type, data))
    }

    fn to_part(&self) -> Part {
        Part::inline(self.mime_type.clone(), STANDARD.encode(&self.data))
    }
}

fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub quality: Option<QualityTier>,
    pub max_reasoning: bool,
}

/// A fully resolved outbound request, ready for a transport.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub capability: CapabilityId,
    pub model: ModelTier,
    pub images: Vec<ImageInput>,
    pub instruction: String,
    pub user_instruction: Option<String>,
    pub options: GenerationOptions,
    pub expects: ResultKind,
}

impl GenerationRequest {
    /// Images first, in the caller's order, then the instruction text.
    pub fn to_wire(&self) -> GenerateContentRequest {
        let mut parts: Vec<Part> = self.images.iter().map(ImageInput::to_part).collect();
        parts.push(Part::text(self.instruction.clone()));

        let config = GenerationConfig {
            image_config: self.options.quality.map(|quality| ImageConfig {
                image_size: quality.as_str().to_string(),
            }),
            thinking_config: self.options.max_reasoning.then_some(ThinkingConfig {
                thinking_budget: MAX_THINKING_BUDGET,
            }),
        };

        GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config: (config != GenerationConfig::default()).then_some(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(options: GenerationOptions) -> GenerationRequest {
        GenerationRequest {
            capability: CapabilityId::FutureChild,
            model: ModelTier::HighQualityImage,
            images: vec![
                ImageInput::new("image/png", vec![0u8, 1, 2]),
                ImageInput::new("image/jpeg", vec![3u8, 4, 5]),
            ],
            instruction: "combine".to_string(),
            user_instruction: None,
            options,
            expects: ResultKind::Image,
        }
    }

    #[test]
    fn test_wire_keeps_image_order_and_appends_text() {
        let wire = request(GenerationOptions::default()).to_wire();
        let parts = &wire.contents[0].parts;
        assert_eq!(parts.len(), 3);
        let first = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(first.mime_type, "image/png");
        assert_eq!(first.data, "AAEC");
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, "AwQF");
        assert_eq!(parts[2].text.as_deref(), Some("combine"));
        assert!(wire.generation_config.is_none());
    }

    #[test]
    fn test_wire_carries_quality_and_reasoning() {
        let wire = request(GenerationOptions {
            quality: Some(QualityTier::FourK),
            max_reasoning: false,
        })
        .to_wire();
        let config = wire.generation_config.unwrap();
        assert_eq!(config.image_config.unwrap().image_size, "4K");
        assert!(config.thinking_config.is_none());

        let wire = request(GenerationOptions {
            quality: None,
            max_reasoning: true,
        })
        .to_wire();
        let config = wire.generation_config.unwrap();
        assert_eq!(config.thinking_config.unwrap().thinking_budget, 32768);
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for_path(Path::new("scan.png")), Some("image/png"));
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for_path(Path::new("noext")), None);
    }
}
