//! Directed edge between two relationship-graph nodes

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// A directed, labelled edge
///
/// Edges are never merged: two relations with the same endpoints produce two
/// edges, told apart by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Relationship text (e.g. "CAUSES", "owns", "BEFORE")
    pub label: String,
    /// Position of the originating relation in its input list
    pub index: usize,
}

impl GraphEdge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        label: impl Into<String>,
        index: usize,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
            index,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
