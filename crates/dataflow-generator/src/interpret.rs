//! Output interpretation.
//!
//! In subprocess mode the only success signal for the draw phase is a
//! marker line on stdout naming the generated HTML file. The marker text
//! is a versioned contract with the generator tool; keep it in one place.

use std::path::PathBuf;

use dataflow_graph::RenderArtifact;

use crate::error::{GeneratorError, GeneratorResult};

/// Marker prefix the generator tool prints when rendering succeeds.
/// The remainder of the line is the artifact path.
pub const PYVIS_HTML_MARKER: &str = "Successfully generated Pyvis HTML:";

/// Scans stdout for the artifact marker and returns the path it names,
/// trimmed of surrounding whitespace. All other lines are log noise.
pub fn extract_artifact_path(stdout: &str) -> Option<PathBuf> {
    for line in stdout.lines() {
        if let Some(idx) = line.find(PYVIS_HTML_MARKER) {
            let suffix = line[idx + PYVIS_HTML_MARKER.len()..].trim();
            if !suffix.is_empty() {
                return Some(PathBuf::from(suffix));
            }
        }
    }
    None
}

/// Interprets the stdout of a zero-exit draw invocation.
///
/// A clean exit with no marker is its own failure mode, distinct from a
/// process failure: the tool ran but produced no recognizable result. The
/// full stdout is preserved for diagnosis.
pub fn interpret(stdout: &str) -> GeneratorResult<RenderArtifact> {
    extract_artifact_path(stdout)
        .map(RenderArtifact::file)
        .ok_or_else(|| GeneratorError::OutputUnparseable {
            stdout: stdout.to_string(),
        })
}
