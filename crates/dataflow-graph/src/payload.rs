//! Graph extraction result types.
//!
//! A [`GraphPayload`] is the structured output of the extraction phase:
//! the edge set, a node-type classification, and aggregate statistics.
//! It carries no rendering state, which is what makes the parse/draw split
//! cache-friendly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A directed edge between two nodes in the data flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Upstream node identifier.
    pub source: String,
    /// Downstream node identifier.
    pub target: String,
}

impl GraphEdge {
    /// Creates a new edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Classification of a node in the data flow graph.
///
/// The generator tool decides the classification; unknown classifications
/// round-trip through [`NodeType::Other`] rather than failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Raw input table or external feed.
    Source,
    /// Derived/transformed table.
    Model,
    /// Static seed data.
    Seed,
    /// Point-in-time snapshot.
    Snapshot,
    /// Downstream consumer (dashboard, report).
    Exposure,
    /// Any classification this crate does not know about.
    #[serde(untagged)]
    Other(String),
}

impl NodeType {
    /// Returns the string identifier for this node type.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Source => "source",
            NodeType::Model => "model",
            NodeType::Seed => "seed",
            NodeType::Snapshot => "snapshot",
            NodeType::Exposure => "exposure",
            NodeType::Other(s) => s,
        }
    }
}

/// Aggregate statistics over an extracted graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of distinct nodes.
    pub node_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Node count per classification.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_counts: BTreeMap<String, usize>,
    /// Any additional statistics reported by the generator tool.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The structured result of the extraction phase.
///
/// Treated as an opaque, serializable value by the orchestration layer:
/// produced by `parse`, consumed by `draw`, and safe to hand back to a
/// caller for later re-rendering without re-extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    /// The edge set.
    pub edges: Vec<GraphEdge>,
    /// Node-type classification keyed by node identifier.
    pub node_types: BTreeMap<String, NodeType>,
    /// Aggregate statistics.
    #[serde(default)]
    pub stats: GraphStats,
}

impl GraphPayload {
    /// Starts building a payload; statistics are derived on `build`.
    pub fn builder() -> GraphPayloadBuilder {
        GraphPayloadBuilder::default()
    }

    /// Returns true when the payload describes no graph at all.
    ///
    /// An empty payload is not a renderable input; `draw` rejects it as an
    /// invalid request rather than producing a blank diagram.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.node_types.is_empty()
    }
}

/// Builder for [`GraphPayload`] that derives [`GraphStats`] from the
/// edges and classifications added to it.
#[derive(Debug, Default)]
pub struct GraphPayloadBuilder {
    edges: Vec<GraphEdge>,
    node_types: BTreeMap<String, NodeType>,
}

impl GraphPayloadBuilder {
    /// Adds a directed edge.
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(GraphEdge::new(source, target));
        self
    }

    /// Records the classification of a node.
    pub fn node_type(mut self, node: impl Into<String>, node_type: NodeType) -> Self {
        self.node_types.insert(node.into(), node_type);
        self
    }

    /// Finalizes the payload, computing node/edge counts and per-type
    /// tallies. Nodes that appear only in edges (no classification) still
    /// count toward `node_count`.
    pub fn build(self) -> GraphPayload {
        let mut nodes: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        for edge in &self.edges {
            nodes.insert(&edge.source);
            nodes.insert(&edge.target);
        }
        for node in self.node_types.keys() {
            nodes.insert(node);
        }

        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        for node_type in self.node_types.values() {
            *type_counts.entry(node_type.as_str().to_string()).or_insert(0) += 1;
        }

        let stats = GraphStats {
            node_count: nodes.len(),
            edge_count: self.edges.len(),
            type_counts,
            extra: BTreeMap::new(),
        };

        GraphPayload {
            edges: self.edges,
            node_types: self.node_types,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_derives_stats() {
        let payload = GraphPayload::builder()
            .edge("a", "b")
            .edge("b", "c")
            .node_type("a", NodeType::Source)
            .node_type("b", NodeType::Model)
            .node_type("c", NodeType::Model)
            .build();

        assert_eq!(payload.stats.node_count, 3);
        assert_eq!(payload.stats.edge_count, 2);
        assert_eq!(payload.stats.type_counts.get("model"), Some(&2));
        assert_eq!(payload.stats.type_counts.get("source"), Some(&1));
    }

    #[test]
    fn test_unclassified_edge_nodes_are_counted() {
        let payload = GraphPayload::builder().edge("x", "y").build();
        assert_eq!(payload.stats.node_count, 2);
        assert!(payload.node_types.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        assert!(GraphPayload::default().is_empty());
        assert!(!GraphPayload::builder().edge("a", "b").build().is_empty());
    }

    #[test]
    fn test_unknown_node_type_round_trips() {
        let json = r#"{"edges":[],"node_types":{"n1":"materialized_view"}}"#;
        let payload: GraphPayload = serde_json::from_str(json).unwrap();
        assert_eq!(
            payload.node_types.get("n1"),
            Some(&NodeType::Other("materialized_view".to_string()))
        );

        let back = serde_json::to_string(&payload).unwrap();
        assert!(back.contains("materialized_view"));
    }

    #[test]
    fn test_extra_stats_are_preserved() {
        let json = r#"{"edges":[],"node_types":{},"stats":{"node_count":0,"edge_count":0,"max_depth":7}}"#;
        let payload: GraphPayload = serde_json::from_str(json).unwrap();
        assert_eq!(
            payload.stats.extra.get("max_depth"),
            Some(&serde_json::json!(7))
        );
    }
}
