use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MemoraError;

/// Declared in display order; lookup tables are indexed by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapabilityId {
    Enhance,
    FutureChild,
    Analyze,
    TimeBridge,
    Restore,
    Album,
    Emotional,
}

impl CapabilityId {
    pub const ALL: [CapabilityId; 7] = [
        CapabilityId::Enhance,
        CapabilityId::FutureChild,
        CapabilityId::Analyze,
        CapabilityId::TimeBridge,
        CapabilityId::Restore,
        CapabilityId::Album,
        CapabilityId::Emotional,
    ];

    /// Position of this id in [`CapabilityId::ALL`] and the lookup tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityId::Enhance => "ENHANCE",
            CapabilityId::FutureChild => "FUTURE_CHILD",
            CapabilityId::TimeBridge => "TIME_BRIDGE",
            CapabilityId::Restore => "RESTORE",
            CapabilityId::Album => "ALBUM",
            CapabilityId::Emotional => "EMOTIONAL",
            CapabilityId::Analyze => "ANALYZE",
        }
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityId {
    type Err = MemoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        CapabilityId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| MemoraError::UnknownCapability(s.to_string()))
    }
}

/// What a capability hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Image,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    FastImage,
    HighQualityImage,
    DeepReasoning,
    FastText,
}

/// Output resolution requested from image generation models.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum QualityTier {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl QualityTier {
    pub const LOWEST: QualityTier = QualityTier::OneK;

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::OneK => "1K",
            QualityTier::TwoK => "2K",
            QualityTier::FourK => "4K",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = MemoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1K" => Ok(QualityTier::OneK),
            "2K" => Ok(QualityTier::TwoK),
            "4K" => Ok(QualityTier::FourK),
            other => Err(MemoraError::ConfigError(format!(
                "Unsupported quality tier: {}",
                other
            ))),
        }
    }
}

/// Display metadata and input constraints of one capability.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    pub id: CapabilityId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub premium: bool,
    pub min_inputs: usize,
    pub max_inputs: usize,
    pub supports_quality: bool,
    pub output: ResultKind,
    pub offers_suggestion: bool,
}

impl Capability {
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_inputs..=self.max_inputs).contains(&count)
    }
}
