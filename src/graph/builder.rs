//! Relationship graph builder
//!
//! One parameterized routine turns any relation list into a node/edge graph.
//! The three relation shapes (causation, entity relations, event relations)
//! differ only in which fields name the endpoints and the edge label; that
//! difference is captured by an [`EndpointFields`] descriptor.

use super::edge::GraphEdge;
use super::node::{DeclaredNode, GraphNode};
use crate::model::{CausationRelation, EntityRelation, EventRelation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Describes which two fields of a relation are its source and target, and
/// what text labels the resulting edge.
pub struct EndpointFields<R> {
    /// Wire name of the source field
    pub source_field: &'static str,
    /// Wire name of the target field
    pub target_field: &'static str,
    source: fn(&R) -> &str,
    target: fn(&R) -> &str,
    label: fn(&R) -> &str,
}

impl<R> EndpointFields<R> {
    pub const fn new(
        source_field: &'static str,
        target_field: &'static str,
        source: fn(&R) -> &str,
        target: fn(&R) -> &str,
        label: fn(&R) -> &str,
    ) -> Self {
        Self {
            source_field,
            target_field,
            source,
            target,
            label,
        }
    }

    pub fn source_of<'r>(&self, relation: &'r R) -> &'r str {
        (self.source)(relation)
    }

    pub fn target_of<'r>(&self, relation: &'r R) -> &'r str {
        (self.target)(relation)
    }

    pub fn label_of<'r>(&self, relation: &'r R) -> &'r str {
        (self.label)(relation)
    }
}

fn causation_source(r: &CausationRelation) -> &str {
    &r.source_occurrence_summary
}

fn causation_target(r: &CausationRelation) -> &str {
    &r.target_occurrence_summary
}

fn causation_label(_: &CausationRelation) -> &str {
    "CAUSES"
}

fn entity_source(r: &EntityRelation) -> &str {
    &r.source_entity
}

fn entity_target(r: &EntityRelation) -> &str {
    &r.target_entity
}

fn entity_label(r: &EntityRelation) -> &str {
    &r.relation
}

fn event_source(r: &EventRelation) -> &str {
    &r.source
}

fn event_target(r: &EventRelation) -> &str {
    &r.target
}

fn event_label(r: &EventRelation) -> &str {
    &r.relation_type
}

/// Causation: occurrence summaries are node ids; every edge reads "CAUSES".
pub const CAUSATION_ENDPOINTS: EndpointFields<CausationRelation> = EndpointFields::new(
    "source_occurrence_summary",
    "target_occurrence_summary",
    causation_source,
    causation_target,
    causation_label,
);

/// Entity relations: entity names are node ids; edges carry the relation verb.
pub const ENTITY_RELATION_ENDPOINTS: EndpointFields<EntityRelation> = EndpointFields::new(
    "source_entity",
    "target_entity",
    entity_source,
    entity_target,
    entity_label,
);

/// Event relations: event ids are node ids; edges carry the relation type.
pub const EVENT_RELATION_ENDPOINTS: EndpointFields<EventRelation> = EndpointFields::new(
    "source",
    "target",
    event_source,
    event_target,
    event_label,
);

/// Uniform node/edge structure consumed by renderers and drawing libraries.
///
/// Serializes as `{"nodes": [...], "links": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    #[serde(rename = "links")]
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map(|n| n.label.as_str()).unwrap_or(id)
    }

    /// Graphviz DOT text for the graph.
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = format!("digraph \"{}\" {{\n", escape_dot(name));
        for node in &self.nodes {
            out.push_str(&format!(
                "  \"{}\" [label=\"{}\"];\n",
                escape_dot(node.id.as_str()),
                escape_dot(&node.label)
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape_dot(edge.source.as_str()),
                escape_dot(edge.target.as_str()),
                escape_dot(&edge.label)
            ));
        }
        out.push_str("}\n");
        out
    }

    /// One line per edge: `source --[label]--> target`, using node labels.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for edge in &self.edges {
            let label = if edge.label.is_empty() { "related" } else { &edge.label };
            out.push_str(&format!(
                "{} --[{}]--> {}\n",
                self.label_of(edge.source.as_str()),
                label,
                self.label_of(edge.target.as_str())
            ));
        }
        out
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Build a graph from declared nodes and a relation list.
///
/// 1. Seed an insertion-ordered node map from `nodes_source` (first id wins).
/// 2. For each relation, add a synthesized node (label = id) for any source
///    or target id not yet present.
/// 3. Emit one edge per relation in input order, labelled via `fields`.
///
/// Edge count always equals relation count and every edge endpoint exists
/// in `nodes`. An empty relation list yields an empty graph.
pub fn build_graph<R>(
    nodes_source: impl IntoIterator<Item = DeclaredNode>,
    relations: &[R],
    fields: &EndpointFields<R>,
) -> GraphData {
    if relations.is_empty() {
        return GraphData::default();
    }

    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for declared in nodes_source {
        if seen.contains_key(&declared.id) {
            continue;
        }
        seen.insert(declared.id.clone(), nodes.len());
        nodes.push(GraphNode::declared(declared.id, declared.label));
    }

    let mut edges = Vec::with_capacity(relations.len());
    for (index, relation) in relations.iter().enumerate() {
        let source = fields.source_of(relation);
        let target = fields.target_of(relation);
        for id in [source, target] {
            if !seen.contains_key(id) {
                seen.insert(id.to_string(), nodes.len());
                nodes.push(GraphNode::synthesized(id));
            }
        }
        edges.push(GraphEdge::new(source, target, fields.label_of(relation), index));
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        source_field = fields.source_field,
        target_field = fields.target_field,
        "built relationship graph"
    );

    GraphData { nodes, edges }
}
