//! Draw command implementation
//!
//! Renders a previously parsed graph payload. Never extracts.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use dataflow_generator::{GeneratorError, GeneratorResult};
use dataflow_graph::GraphPayload;

use super::json_output::FlowOutput;
use super::{build_service, print_artifact, report_error, write_artifact};

/// Run the draw command.
///
/// # Arguments
/// * `data` - Path to a graph payload JSON file produced by `parse`
///
/// # Returns
/// Exit code: 0 on success, 1 on any failure
pub fn run(
    data: &str,
    output: Option<&str>,
    json: bool,
    timeout_secs: Option<u64>,
) -> Result<ExitCode> {
    let payload = match load_payload(data) {
        Ok(payload) => payload,
        Err(e) => return Ok(report_error(&e, json)),
    };

    let service = build_service(timeout_secs);

    match service.draw(Some(&payload)) {
        Ok(artifact) => {
            let artifact = match output {
                Some(dest) => write_artifact(&artifact, dest)?,
                None => artifact,
            };

            if json {
                println!("{}", FlowOutput::success(None, Some(artifact)).to_json());
            } else {
                println!("{} rendered graph data from {data}", "ok".green());
                print_artifact(&artifact);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_error(&e, json)),
    }
}

/// Loads a payload file; read and parse problems are the caller's error,
/// not an internal fault.
fn load_payload(path: &str) -> GeneratorResult<GraphPayload> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        GeneratorError::invalid_request(format!("could not read graph data {path}: {e}"))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        GeneratorError::invalid_request(format!("malformed graph data in {path}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_payload_missing_file_is_invalid_request() {
        let err = load_payload("/nonexistent/payload.json").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRequest { .. }));
    }

    #[test]
    fn test_load_payload_malformed_json_is_invalid_request() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("payload.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_payload(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRequest { .. }));
    }

    #[test]
    fn test_load_payload_round_trip() {
        let payload = GraphPayload::builder().edge("a", "b").build();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("payload.json");
        std::fs::write(&path, serde_json::to_string(&payload).unwrap()).unwrap();

        let loaded = load_payload(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, payload);
    }
}
