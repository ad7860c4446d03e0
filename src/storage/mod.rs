pub mod gallery;

pub use gallery::{ArtifactIdGenerator, SessionGallery};
