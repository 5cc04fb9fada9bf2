//! DataFlow Graph Data Model
//!
//! This crate provides the shared types exchanged between the generation
//! orchestration layer and its callers: the structured graph extraction
//! result ([`GraphPayload`]), the rendered visualization ([`RenderArtifact`]),
//! and the [`ServiceError`] trait that gives every failure a stable,
//! machine-readable code.
//!
//! # Overview
//!
//! Extraction and rendering are deliberately split: a `GraphPayload` is the
//! expensive artifact (produced once per metadata dump), while a
//! `RenderArtifact` is cheap to re-produce from a payload the caller already
//! holds. Both are plain serde values so callers can cache, ship, and replay
//! them freely.
//!
//! # Example
//!
//! ```
//! use dataflow_graph::{GraphEdge, GraphPayload, GraphStats, NodeType};
//!
//! let payload = GraphPayload::builder()
//!     .edge("raw_orders", "stg_orders")
//!     .edge("stg_orders", "fct_orders")
//!     .node_type("raw_orders", NodeType::Source)
//!     .node_type("stg_orders", NodeType::Model)
//!     .node_type("fct_orders", NodeType::Model)
//!     .build();
//!
//! assert_eq!(payload.stats.node_count, 3);
//! assert_eq!(payload.stats.edge_count, 2);
//! assert!(!payload.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`payload`]: Graph extraction result types
//! - [`artifact`]: Render artifact type (inline HTML or file path)
//! - [`error`]: The `ServiceError` trait for stable error codes

pub mod artifact;
pub mod error;
pub mod payload;

// Re-export commonly used types at the crate root
pub use artifact::RenderArtifact;
pub use error::ServiceError;
pub use payload::{GraphEdge, GraphPayload, GraphPayloadBuilder, GraphStats, NodeType};
