//! Turns a capability, its photos and the user's text into a concrete request.
//!
//! Per-capability behavior lives in [`PROFILES`]; adding a capability means
//! adding a row, not a branch.

use crate::error::{MemoraError, Result};
use crate::models::{
    Capability, CapabilityId, GenerationOptions, GenerationRequest, ImageInput, ModelTier,
    QualityTier,
};
use crate::registry;

const ENHANCE_DEFAULT: &str =
    "Enhance this image to have professional studio lighting and sharp details.";
const FUTURE_CHILD_INSTRUCTION: &str = "Generate a photorealistic image of a young child (approx 5 years old) that genetically looks like a combination of the two people provided in the images. Focus on facial features.";
const TIME_BRIDGE_INSTRUCTION: &str = "Modernize this photo. If it looks old, make it look like it was taken today with a high-end camera. Keep the pose and setting but update the aesthetic quality.";
const RESTORE_INSTRUCTION: &str = "Restore this image. Fix any scratches, tears, or noise. If it is black and white, colorize it naturally. Make it look like a pristine memory.";
const ALBUM_INSTRUCTION: &str = "Create a seamless, artistic collage using the people and elements from the provided photos. Arrange them in a harmonious composition suitable for a family album.";
const EMOTIONAL_DEFAULT_MOOD: &str = "nostalgic and warm";
const ANALYZE_DEFAULT: &str = "Analyze this image in extreme detail. Describe the emotions, the technical aspects (lighting, composition), and the story it tells.";

/// How the instruction text is derived from the user's text.
#[derive(Debug, Clone, Copy)]
pub enum InstructionRule {
    /// Always this text; user text is ignored.
    Fixed(&'static str),
    /// User text wrapped as an edit directive, or the default.
    EditDirective { default: &'static str },
    /// User text (or the default) substituted into a sentence.
    Template {
        prefix: &'static str,
        suffix: &'static str,
        default: &'static str,
    },
    /// User text verbatim, or the default.
    Verbatim { default: &'static str },
}

impl InstructionRule {
    fn render(&self, user: Option<&str>) -> String {
        match *self {
            InstructionRule::Fixed(text) => text.to_string(),
            InstructionRule::EditDirective { default } => match user {
                Some(text) => format!("Edit this image based on this instruction: {}", text),
                None => default.to_string(),
            },
            InstructionRule::Template {
                prefix,
                suffix,
                default,
            } => format!("{}{}{}", prefix, user.unwrap_or(default), suffix),
            InstructionRule::Verbatim { default } => user.unwrap_or(default).to_string(),
        }
    }
}

/// Which generation options a capability carries.
#[derive(Debug, Clone, Copy)]
pub enum OptionRule {
    None,
    CallerQuality,
    FixedQuality(QualityTier),
    MaxReasoning,
}

impl OptionRule {
    fn options(&self, requested: Option<QualityTier>) -> GenerationOptions {
        match *self {
            OptionRule::None => GenerationOptions::default(),
            OptionRule::CallerQuality => GenerationOptions {
                quality: Some(requested.unwrap_or_default()),
                max_reasoning: false,
            },
            OptionRule::FixedQuality(quality) => GenerationOptions {
                quality: Some(quality),
                max_reasoning: false,
            },
            OptionRule::MaxReasoning => GenerationOptions {
                quality: None,
                max_reasoning: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestProfile {
    pub capability: CapabilityId,
    pub model: ModelTier,
    pub instruction: InstructionRule,
    pub options: OptionRule,
}

pub const PROFILES: [RequestProfile; CapabilityId::ALL.len()] = [
    RequestProfile {
        capability: CapabilityId::Enhance,
        model: ModelTier::FastImage,
        instruction: InstructionRule::EditDirective {
            default: ENHANCE_DEFAULT,
        },
        options: OptionRule::None,
    },
    RequestProfile {
        capability: CapabilityId::FutureChild,
        model: ModelTier::HighQualityImage,
        instruction: InstructionRule::Fixed(FUTURE_CHILD_INSTRUCTION),
        options: OptionRule::CallerQuality,
    },
    RequestProfile {
        capability: CapabilityId::Analyze,
        model: ModelTier::DeepReasoning,
        instruction: InstructionRule::Verbatim {
            default: ANALYZE_DEFAULT,
        },
        options: OptionRule::MaxReasoning,
    },
    RequestProfile {
        capability: CapabilityId::TimeBridge,
        model: ModelTier::FastImage,
        instruction: InstructionRule::Fixed(TIME_BRIDGE_INSTRUCTION),
        options: OptionRule::None,
    },
    RequestProfile {
        capability: CapabilityId::Restore,
        model: ModelTier::HighQualityImage,
        instruction: InstructionRule::Fixed(RESTORE_INSTRUCTION),
        options: OptionRule::None,
    },
    RequestProfile {
        capability: CapabilityId::Album,
        model: ModelTier::HighQualityImage,
        instruction: InstructionRule::Fixed(ALBUM_INSTRUCTION),
        options: OptionRule::FixedQuality(QualityTier::LOWEST),
    },
    RequestProfile {
        capability: CapabilityId::Emotional,
        model: ModelTier::FastImage,
        instruction: InstructionRule::Template {
            prefix: "Apply a ",
            suffix: " emotional style to this image. The lighting and color grading should evoke deep feelings.",
            default: EMOTIONAL_DEFAULT_MOOD,
        },
        options: OptionRule::None,
    },
];

// Rows must sit at their capability's index.
const _: () = {
    let mut i = 0;
    while i < PROFILES.len() {
        assert!(PROFILES[i].capability.index() == i, "request profiles out of order");
        i += 1;
    }
};

pub fn profile(id: CapabilityId) -> &'static RequestProfile {
    let table: &'static [RequestProfile] = &PROFILES;
    &table[id.index()]
}

pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build(
        capability: &Capability,
        images: Vec<ImageInput>,
        instruction: Option<&str>,
        quality: Option<QualityTier>,
    ) -> Result<GenerationRequest> {
        Self::validate_inputs(capability, images.len())?;

        let profile = profile(capability.id);
        let user_instruction = instruction
            .map(str::trim)
            .filter(|text| !text.is_empty());

        if quality.is_some() && !capability.supports_quality {
            log::debug!(
                "Ignoring requested quality tier for {}, it is not caller-selectable",
                capability.id
            );
        }

        Ok(GenerationRequest {
            capability: capability.id,
            model: profile.model,
            images,
            instruction: profile.instruction.render(user_instruction),
            user_instruction: user_instruction.map(String::from),
            options: profile.options.options(quality),
            expects: capability.output,
        })
    }

    /// Same as [`RequestBuilder::build`] but starting from a raw identifier.
    pub fn build_for(
        identifier: &str,
        images: Vec<ImageInput>,
        instruction: Option<&str>,
        quality: Option<QualityTier>,
    ) -> Result<GenerationRequest> {
        let capability = registry::lookup(identifier)?;
        Self::build(capability, images, instruction, quality)
    }

    pub fn validate_inputs(capability: &Capability, provided: usize) -> Result<()> {
        if capability.accepts(provided) {
            Ok(())
        } else {
            Err(MemoraError::InsufficientInputs {
                capability: capability.id.to_string(),
                min: capability.min_inputs,
                max: capability.max_inputs,
                provided,
            })
        }
    }
}
