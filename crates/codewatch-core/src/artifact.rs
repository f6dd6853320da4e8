//! Source artifact references handed to detectors and extractors.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::Framework;

/// An opaque, read-only `(path, content)` reference supplied by an artifact
/// provider, tagged with the framework it is written against. The core never
/// reads files itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    path: PathBuf,
    content: Arc<str>,
    framework: Framework,
}

impl SourceArtifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Arc<str>>, framework: Framework) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            framework,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn framework(&self) -> &Framework {
        &self.framework
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Display form of the path used in error payloads.
    pub(crate) fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}
