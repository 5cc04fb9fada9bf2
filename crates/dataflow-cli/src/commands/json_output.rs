//! JSON output types for machine-readable CLI output.
//!
//! This module provides the uniform result envelope emitted by the
//! `--json` flag and by the WebSocket service. Callers distinguish
//! failure modes only through the stable `code` field; everything else is
//! for humans.

use serde::{Deserialize, Serialize};

use dataflow_graph::{GraphPayload, RenderArtifact, ServiceError};

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "FLOW_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Captured diagnostic text (tool stderr or stdout), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    /// Sets the diagnostic detail for this error.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Builds a JSON error from any service error.
    pub fn from_error(err: &impl ServiceError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message(),
            detail: err.detail().map(str::to_string),
        }
    }
}

/// The uniform result envelope for all three operations.
///
/// On success, `data` and/or `html` are set depending on the operation;
/// on failure, `errors` carries at least one entry and both payload
/// fields are absent. There is no partially successful envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowOutput {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The extracted graph data (parse, generate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GraphPayload>,
    /// The rendered visualization (draw, generate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<RenderArtifact>,
    /// Errors, empty on success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl FlowOutput {
    /// A successful envelope with the given payload and/or artifact.
    pub fn success(data: Option<GraphPayload>, html: Option<RenderArtifact>) -> Self {
        Self {
            success: true,
            data,
            html,
            errors: Vec::new(),
        }
    }

    /// A failed envelope with a single error.
    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            data: None,
            html: None,
            errors: vec![error],
        }
    }

    /// A failed envelope built from a service error.
    pub fn from_error(err: &impl ServiceError) -> Self {
        Self::failure(JsonError::from_error(err))
    }

    /// Serializes the envelope, falling back to a fixed error document if
    /// serialization itself fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"errors":[{"code":"FLOW_006","message":"Failed to serialize response"}]}"#
                .to_string()
        })
    }
}
