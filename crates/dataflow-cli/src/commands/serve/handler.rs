//! Request handler logic for the WebSocket generation service.

use dataflow_generator::{GenerationService, Generator, GeneratorError};

use crate::commands::json_output::FlowOutput;

use super::types::FlowRequest;

/// Handle a JSON request and return a JSON response envelope.
///
/// Generic over the backend so tests can run against an in-process
/// generator instead of spawning the real tool.
pub fn handle_request<G: Generator>(service: &GenerationService<G>, json_text: &str) -> String {
    let request: FlowRequest = match serde_json::from_str(json_text) {
        Ok(req) => req,
        Err(e) => {
            let err = GeneratorError::invalid_request(format!("invalid request JSON: {e}"));
            return FlowOutput::from_error(&err).to_json();
        }
    };

    let output = match request {
        FlowRequest::Generate { metadata_path } => match service.generate(&metadata_path) {
            Ok((payload, artifact)) => FlowOutput::success(Some(payload), Some(artifact)),
            Err(e) => FlowOutput::from_error(&e),
        },
        FlowRequest::Parse { metadata_path } => match service.parse(&metadata_path) {
            Ok(payload) => FlowOutput::success(Some(payload), None),
            Err(e) => FlowOutput::from_error(&e),
        },
        FlowRequest::Draw { payload } => match service.draw(payload.as_ref()) {
            Ok(artifact) => FlowOutput::success(None, Some(artifact)),
            Err(e) => FlowOutput::from_error(&e),
        },
    };

    output.to_json()
}
