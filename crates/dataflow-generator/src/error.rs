//! Error types for the generation orchestration layer.

use dataflow_graph::ServiceError;
use thiserror::Error;

/// Result type for generation operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while orchestrating the generator tool.
///
/// Every variant maps to a stable `FLOW_00x` code via [`ServiceError`].
/// Errors are local to a single request; no error state persists across
/// requests and nothing is retried automatically.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The request itself was malformed; the caller must correct it.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// No runnable command exists and every bootstrap fallback failed.
    #[error("Generator tool unavailable. Attempted fallbacks: {}", attempts.join("; "))]
    ToolUnavailable { attempts: Vec<String> },

    /// The tool ran but exited non-zero; stderr carries the diagnostic.
    #[error("Generator tool exited with status {exit_code}: {stderr}")]
    ToolExecutionFailed { exit_code: i32, stderr: String },

    /// The tool exited cleanly but its output contained no recognizable
    /// result.
    #[error("Could not locate generated artifact in tool output")]
    OutputUnparseable { stdout: String },

    /// The tool exceeded the configured deadline and was terminated.
    #[error("Generator tool timed out after {timeout_secs} seconds")]
    ToolTimeout { timeout_secs: u64 },

    /// Any unexpected fault inside the orchestration itself.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GeneratorError {
    /// Creates a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new tool execution failed error.
    pub fn execution_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ToolExecutionFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {err}"))
    }
}

impl ServiceError for GeneratorError {
    fn code(&self) -> &'static str {
        match self {
            GeneratorError::InvalidRequest { .. } => "FLOW_001",
            GeneratorError::ToolUnavailable { .. } => "FLOW_002",
            GeneratorError::ToolExecutionFailed { .. } => "FLOW_003",
            GeneratorError::OutputUnparseable { .. } => "FLOW_004",
            GeneratorError::ToolTimeout { .. } => "FLOW_005",
            GeneratorError::Internal { .. } => "FLOW_006",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            GeneratorError::ToolExecutionFailed { stderr, .. } => Some(stderr),
            GeneratorError::OutputUnparseable { stdout } => Some(stdout),
            _ => None,
        }
    }

    fn category(&self) -> &'static str {
        match self {
            GeneratorError::InvalidRequest { .. } => "request",
            GeneratorError::ToolUnavailable { .. }
            | GeneratorError::ToolExecutionFailed { .. }
            | GeneratorError::OutputUnparseable { .. }
            | GeneratorError::ToolTimeout { .. } => "tool",
            GeneratorError::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::invalid_request("metadata_path is required");
        assert!(err.to_string().contains("metadata_path is required"));

        let err = GeneratorError::execution_failed(3, "bad metadata");
        assert!(err.to_string().contains("status 3"));
        assert!(err.to_string().contains("bad metadata"));

        let err = GeneratorError::ToolTimeout { timeout_secs: 300 };
        assert!(err.to_string().contains("300 seconds"));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GeneratorError::invalid_request("x").code(),
            "FLOW_001"
        );
        assert_eq!(
            GeneratorError::ToolUnavailable { attempts: vec![] }.code(),
            "FLOW_002"
        );
        assert_eq!(GeneratorError::execution_failed(1, "e").code(), "FLOW_003");
        assert_eq!(
            GeneratorError::OutputUnparseable {
                stdout: String::new()
            }
            .code(),
            "FLOW_004"
        );
        assert_eq!(
            GeneratorError::ToolTimeout { timeout_secs: 1 }.code(),
            "FLOW_005"
        );
        assert_eq!(GeneratorError::internal("x").code(), "FLOW_006");
    }

    #[test]
    fn test_detail_carries_captured_streams() {
        let err = GeneratorError::execution_failed(3, "bad metadata");
        assert_eq!(err.detail(), Some("bad metadata"));

        let err = GeneratorError::OutputUnparseable {
            stdout: "noise\nmore noise".to_string(),
        };
        assert_eq!(err.detail(), Some("noise\nmore noise"));

        assert_eq!(GeneratorError::invalid_request("x").detail(), None);
    }
}
