//! The generation service facade.
//!
//! Validates requests and composes the collaborator's parse/draw phases.
//! Extraction is the expensive step; the parse/draw split exists so a
//! caller can hold on to a [`GraphPayload`] and re-render it without
//! paying for extraction again.

use std::path::Path;

use dataflow_graph::{GraphPayload, RenderArtifact};

use crate::backend::{Generator, SubprocessGenerator};
use crate::error::{GeneratorError, GeneratorResult};

/// Orchestration facade over a [`Generator`] backend.
///
/// Stateless between requests: nothing a failed request leaves behind can
/// affect the next one.
pub struct GenerationService<G: Generator = SubprocessGenerator> {
    backend: G,
}

impl GenerationService<SubprocessGenerator> {
    /// Creates a service backed by the external tool subprocess.
    pub fn new() -> Self {
        Self {
            backend: SubprocessGenerator::new(),
        }
    }
}

impl Default for GenerationService<SubprocessGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Generator> GenerationService<G> {
    /// Creates a service over an explicit backend (subprocess, direct, or
    /// a test double).
    pub fn with_backend(backend: G) -> Self {
        Self { backend }
    }

    /// Extracts graph data from the metadata dump. No rendering cost is
    /// paid.
    pub fn parse(&self, metadata_path: &str) -> GeneratorResult<GraphPayload> {
        let path = validate_metadata_path(metadata_path)?;
        self.backend.parse(path)
    }

    /// Renders previously extracted graph data. Never triggers
    /// extraction; an absent or empty payload is the caller's error.
    pub fn draw(&self, payload: Option<&GraphPayload>) -> GeneratorResult<RenderArtifact> {
        let payload = payload.ok_or_else(|| {
            GeneratorError::invalid_request(
                "draw requires previously parsed graph data; call parse first",
            )
        })?;
        if payload.is_empty() {
            return Err(GeneratorError::invalid_request(
                "graph payload contains no nodes or edges",
            ));
        }
        self.backend.draw(payload)
    }

    /// Extraction followed by rendering, as one call. A rendering failure
    /// after a successful extraction fails the whole call; the partial
    /// payload is never passed off as a full result.
    pub fn generate(
        &self,
        metadata_path: &str,
    ) -> GeneratorResult<(GraphPayload, RenderArtifact)> {
        let payload = self.parse(metadata_path)?;
        let artifact = self.backend.draw(&payload)?;
        Ok((payload, artifact))
    }
}

/// Rejects empty and nonexistent metadata paths before any tool
/// resolution happens.
fn validate_metadata_path(metadata_path: &str) -> GeneratorResult<&Path> {
    if metadata_path.trim().is_empty() {
        return Err(GeneratorError::invalid_request("metadata_path is required"));
    }
    let path = Path::new(metadata_path);
    if !path.exists() {
        return Err(GeneratorError::invalid_request(format!(
            "metadata file not found: {metadata_path}"
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DirectGenerator;
    use dataflow_graph::NodeType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_payload() -> GraphPayload {
        GraphPayload::builder()
            .edge("raw", "stg")
            .edge("stg", "fct")
            .node_type("raw", NodeType::Source)
            .node_type("stg", NodeType::Model)
            .node_type("fct", NodeType::Model)
            .build()
    }

    fn counting_service(
        parse_calls: Arc<AtomicUsize>,
        draw_calls: Arc<AtomicUsize>,
    ) -> GenerationService<impl Generator> {
        GenerationService::with_backend(DirectGenerator::new(
            move |_path: &Path| {
                parse_calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_payload())
            },
            move |payload: &GraphPayload| {
                draw_calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("<html>{}</html>", payload.stats.edge_count))
            },
        ))
    }

    #[test]
    fn test_empty_metadata_path_is_rejected_before_backend() {
        let parse_calls = Arc::new(AtomicUsize::new(0));
        let draw_calls = Arc::new(AtomicUsize::new(0));
        let service = counting_service(parse_calls.clone(), draw_calls.clone());

        for path in ["", "   "] {
            let err = service.parse(path).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidRequest { .. }));
            let err = service.generate(path).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidRequest { .. }));
        }
        assert_eq!(parse_calls.load(Ordering::SeqCst), 0);
        assert_eq!(draw_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_metadata_file_is_rejected_before_backend() {
        let parse_calls = Arc::new(AtomicUsize::new(0));
        let service = counting_service(parse_calls.clone(), Arc::new(AtomicUsize::new(0)));

        let err = service.parse("/nonexistent/metadata.json").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRequest { .. }));
        assert_eq!(parse_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_draw_without_payload_is_invalid_request() {
        let draw_calls = Arc::new(AtomicUsize::new(0));
        let service = counting_service(Arc::new(AtomicUsize::new(0)), draw_calls.clone());

        let err = service.draw(None).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRequest { .. }));

        let empty = GraphPayload::default();
        let err = service.draw(Some(&empty)).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRequest { .. }));

        assert_eq!(draw_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_then_draw_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let service = counting_service(
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        );

        let payload = service.parse(tmp.path().to_str().unwrap()).unwrap();
        let artifact = service.draw(Some(&payload)).unwrap();
        assert_eq!(artifact, RenderArtifact::inline("<html>2</html>"));
    }

    #[test]
    fn test_generate_equals_parse_plus_draw() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let service = counting_service(
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        );

        let (payload, artifact) = service.generate(path).unwrap();
        let separate_payload = service.parse(path).unwrap();
        let separate_artifact = service.draw(Some(&separate_payload)).unwrap();

        assert_eq!(payload, separate_payload);
        assert_eq!(artifact, separate_artifact);
    }

    #[test]
    fn test_generate_reports_draw_failure_not_partial_success() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let service = GenerationService::with_backend(DirectGenerator::new(
            |_path: &Path| Ok(sample_payload()),
            |_payload: &GraphPayload| {
                Err(GeneratorError::execution_failed(2, "render crashed"))
            },
        ));

        let err = service.generate(tmp.path().to_str().unwrap()).unwrap_err();
        match err {
            GeneratorError::ToolExecutionFailed { exit_code, stderr } => {
                assert_eq!(exit_code, 2);
                assert_eq!(stderr, "render crashed");
            }
            other => panic!("expected ToolExecutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_backend_execution_failure_passes_through() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let service = GenerationService::with_backend(DirectGenerator::new(
            |_path: &Path| Err(GeneratorError::execution_failed(3, "bad metadata")),
            |_payload: &GraphPayload| Ok(String::new()),
        ));

        let err = service.parse(tmp.path().to_str().unwrap()).unwrap_err();
        match err {
            GeneratorError::ToolExecutionFailed { exit_code, stderr } => {
                assert_eq!(exit_code, 3);
                assert_eq!(stderr, "bad metadata");
            }
            other => panic!("expected ToolExecutionFailed, got {other:?}"),
        }
    }
}
