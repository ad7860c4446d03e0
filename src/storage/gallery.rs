use chrono::{TimeZone, Utc};

use crate::error::{MemoraError, Result};
use crate::models::{CapabilityId, GenerationResult, SavedArtifact};

/// Mints artifact ids from millisecond timestamps, bumped so that ids
/// issued within the same millisecond stay strictly increasing.
#[derive(Debug, Default)]
pub struct ArtifactIdGenerator {
    last: i64,
}

impl ArtifactIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_millis(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Results the user chose to keep during this session. Nothing is written
/// anywhere; dropping the gallery drops the artifacts.
#[derive(Debug, Default)]
pub struct SessionGallery {
    // Newest first.
    artifacts: Vec<SavedArtifact>,
    ids: ArtifactIdGenerator,
}

impl SessionGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, artifact: SavedArtifact) -> Result<()> {
        if self.get(&artifact.id).is_some() {
            return Err(MemoraError::DuplicateArtifact(artifact.id));
        }
        log::debug!(
            "Saving artifact {} ({}) to gallery",
            artifact.id,
            artifact.capability
        );
        self.artifacts.insert(0, artifact);
        Ok(())
    }

    /// Wraps `result` in a fresh artifact and appends it.
    pub fn save(
        &mut self,
        capability: CapabilityId,
        prompt: impl Into<String>,
        result: GenerationResult,
    ) -> &SavedArtifact {
        // Ids are strictly increasing, so a collision with an appended
        // artifact can only come from a caller-chosen id; skip past it.
        let mut millis = self.ids.next_millis();
        while self.get(&millis.to_string()).is_some() {
            millis = self.ids.next_millis();
        }
        let artifact = SavedArtifact {
            id: millis.to_string(),
            created_at: Utc
                .timestamp_millis_opt(millis)
                .single()
                .unwrap_or_else(Utc::now),
            capability,
            prompt: prompt.into(),
            result,
        };
        log::info!("Saved {} result as artifact {}", capability, artifact.id);
        self.artifacts.insert(0, artifact);
        &self.artifacts[0]
    }

    /// Removing an id that is not present is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<SavedArtifact> {
        let index = self.artifacts.iter().position(|artifact| artifact.id == id)?;
        Some(self.artifacts.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&SavedArtifact> {
        self.artifacts.iter().find(|artifact| artifact.id == id)
    }

    /// Most recent first.
    pub fn list(&self) -> &[SavedArtifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(id: &str) -> SavedArtifact {
        SavedArtifact {
            id: id.to_string(),
            created_at: Utc::now(),
            capability: CapabilityId::Enhance,
            prompt: format!("prompt {}", id),
            result: GenerationResult::Text {
                text: id.to_string(),
            },
        }
    }

    fn ids(gallery: &SessionGallery) -> Vec<&str> {
        gallery.list().iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let mut gallery = SessionGallery::new();
        gallery.append(artifact("a")).unwrap();
        gallery.append(artifact("b")).unwrap();
        assert_eq!(ids(&gallery), vec!["b", "a"]);

        let removed = gallery.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(ids(&gallery), vec!["b"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut gallery = SessionGallery::new();
        gallery.append(artifact("a")).unwrap();
        assert!(gallery.remove("nonexistent").is_none());
        assert_eq!(ids(&gallery), vec!["a"]);
    }

    #[test]
    fn test_duplicate_append_rejected() {
        let mut gallery = SessionGallery::new();
        gallery.append(artifact("a")).unwrap();
        assert!(matches!(
            gallery.append(artifact("a")),
            Err(MemoraError::DuplicateArtifact(id)) if id == "a"
        ));
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_saved_ids_are_unique_and_increasing() {
        let mut gallery = SessionGallery::new();
        let mut minted = Vec::new();
        for _ in 0..50 {
            let saved = gallery.save(
                CapabilityId::Analyze,
                "",
                GenerationResult::Text {
                    text: "ok".into(),
                },
            );
            minted.push(saved.id.parse::<i64>().unwrap());
        }
        assert!(minted.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(gallery.len(), 50);
    }

    #[test]
    fn test_image_round_trip_through_gallery() {
        let result = GenerationResult::Image {
            mime_type: "image/png".into(),
            data: "iVBORw0KGgo=".into(),
        };
        let expected = result.data_uri();

        let mut gallery = SessionGallery::new();
        let id = gallery
            .save(CapabilityId::Restore, "", result)
            .id
            .clone();
        assert_eq!(gallery.get(&id).unwrap().result.data_uri(), expected);
    }
}
