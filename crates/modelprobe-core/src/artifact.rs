use std::path::PathBuf;

use crate::SERVE_TAG;

/// Locates a model package on disk: the export directory plus the tag set
/// selecting which of its variants to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelArtifact {
    pub export_dir: PathBuf,
    pub tags: Vec<String>,
}

impl ModelArtifact {
    /// Artifact for the serving variant of the package at `export_dir`.
    pub fn serving(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            tags: vec![SERVE_TAG.to_string()],
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
