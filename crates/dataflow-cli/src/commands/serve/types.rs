//! Request types for the WebSocket generation service.

use serde::Deserialize;

use dataflow_graph::GraphPayload;

/// Request types supported by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowRequest {
    /// Extract and render in one round trip.
    Generate {
        /// Path to the metadata dump.
        metadata_path: String,
    },
    /// Extract graph data only.
    Parse {
        /// Path to the metadata dump.
        metadata_path: String,
    },
    /// Render previously extracted graph data.
    Draw {
        /// Payload returned by an earlier parse. Optional so that a draw
        /// with no payload is reported as an invalid request rather than
        /// a JSON parse failure.
        #[serde(default)]
        payload: Option<GraphPayload>,
    },
}
