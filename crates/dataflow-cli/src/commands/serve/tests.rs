//! Tests for the WebSocket generation service.

use std::path::Path;

use dataflow_generator::{DirectGenerator, GenerationService, Generator};
use dataflow_graph::{GraphPayload, NodeType, RenderArtifact};

use crate::commands::json_output::FlowOutput;

use super::handler::handle_request;

fn sample_payload() -> GraphPayload {
    GraphPayload::builder()
        .edge("raw", "stg")
        .node_type("raw", NodeType::Source)
        .node_type("stg", NodeType::Model)
        .build()
}

fn test_service() -> GenerationService<impl Generator> {
    GenerationService::with_backend(DirectGenerator::new(
        |_path: &Path| Ok(sample_payload()),
        |payload: &GraphPayload| Ok(format!("<html>{} nodes</html>", payload.stats.node_count)),
    ))
}

fn parse_response(json: &str) -> FlowOutput {
    serde_json::from_str(json).expect("response envelope must deserialize")
}

#[test]
fn test_invalid_request_json() {
    let service = test_service();
    let output = parse_response(&handle_request(&service, "{not json"));
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "FLOW_001");
}

#[test]
fn test_unknown_request_type() {
    let service = test_service();
    let output = parse_response(&handle_request(&service, r#"{"type":"explode"}"#));
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "FLOW_001");
}

#[test]
fn test_generate_with_empty_metadata_path() {
    let service = test_service();
    let output = parse_response(&handle_request(
        &service,
        r#"{"type":"generate","metadata_path":""}"#,
    ));
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "FLOW_001");
    assert!(output.data.is_none());
    assert!(output.html.is_none());
}

#[test]
fn test_parse_success() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let service = test_service();
    let request = format!(
        r#"{{"type":"parse","metadata_path":"{}"}}"#,
        tmp.path().display()
    );

    let output = parse_response(&handle_request(&service, &request));
    assert!(output.success);
    let data = output.data.expect("parse returns graph data");
    assert_eq!(data.stats.node_count, 2);
    assert!(output.html.is_none());
}

#[test]
fn test_draw_without_payload() {
    let service = test_service();
    let output = parse_response(&handle_request(&service, r#"{"type":"draw"}"#));
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "FLOW_001");
}

#[test]
fn test_draw_with_payload() {
    let service = test_service();
    let payload_json = serde_json::to_string(&sample_payload()).unwrap();
    let request = format!(r#"{{"type":"draw","payload":{payload_json}}}"#);

    let output = parse_response(&handle_request(&service, &request));
    assert!(output.success);
    assert_eq!(
        output.html,
        Some(RenderArtifact::inline("<html>2 nodes</html>"))
    );
}

#[test]
fn test_generate_success_returns_data_and_html() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let service = test_service();
    let request = format!(
        r#"{{"type":"generate","metadata_path":"{}"}}"#,
        tmp.path().display()
    );

    let output = parse_response(&handle_request(&service, &request));
    assert!(output.success);
    assert!(output.data.is_some());
    assert!(output.html.is_some());
    assert!(output.errors.is_empty());
}
