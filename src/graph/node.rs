//! Node representation in a relationship graph

use serde::{Deserialize, Serialize};

/// Identifier of a graph node.
///
/// Identity is by string value: two relations naming the same occurrence
/// summary, entity or event id refer to the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A node declared by the result itself (an event summary, a known event id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredNode {
    pub id: String,
    pub label: String,
}

impl DeclaredNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A node in a relationship graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Text drawn next to the node
    pub label: String,
    /// True when the node exists only because a relation referenced it
    #[serde(default)]
    pub synthesized: bool,
}

impl GraphNode {
    /// A declared node; an empty label falls back to the id.
    pub fn declared(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let label = label.into();
        Self {
            label: if label.is_empty() { id.clone() } else { label },
            id: NodeId(id),
            synthesized: false,
        }
    }

    /// A node created on demand for a relation endpoint; labelled by its id.
    pub fn synthesized(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id: NodeId(id),
            synthesized: true,
        }
    }
}
