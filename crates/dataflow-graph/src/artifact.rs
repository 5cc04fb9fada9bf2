//! Render artifact type.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The rendered visualization produced by the draw phase.
///
/// Direct (in-process) invocation returns the HTML document inline;
/// subprocess invocation returns the path the tool wrote the document to.
/// Callers that need the document body regardless of mode can use
/// [`RenderArtifact::read_html`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderArtifact {
    /// The HTML document itself.
    Inline {
        /// Full document text.
        html: String,
    },
    /// A filesystem path to the generated HTML document.
    File {
        /// Location of the document on disk.
        path: PathBuf,
    },
}

impl RenderArtifact {
    /// Creates an inline artifact.
    pub fn inline(html: impl Into<String>) -> Self {
        Self::Inline { html: html.into() }
    }

    /// Creates a file artifact.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Returns the artifact path, if this is a file artifact.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Inline { .. } => None,
            Self::File { path } => Some(path),
        }
    }

    /// Returns the HTML document body, reading it from disk for file
    /// artifacts.
    pub fn read_html(&self) -> std::io::Result<String> {
        match self {
            Self::Inline { html } => Ok(html.clone()),
            Self::File { path } => std::fs::read_to_string(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_artifact() {
        let artifact = RenderArtifact::inline("<html></html>");
        assert_eq!(artifact.path(), None);
        assert_eq!(artifact.read_html().unwrap(), "<html></html>");
    }

    #[test]
    fn test_file_artifact_serialization() {
        let artifact = RenderArtifact::file("/tmp/flow.html");
        let json = serde_json::to_string(&artifact).unwrap();
        assert_eq!(json, r#"{"kind":"file","path":"/tmp/flow.html"}"#);

        let back: RenderArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }
}
