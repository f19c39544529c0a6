//! The three relationship graphs derived from an analysis result

use super::builder::{
    build_graph, GraphData, CAUSATION_ENDPOINTS, ENTITY_RELATION_ENDPOINTS,
    EVENT_RELATION_ENDPOINTS,
};
use super::node::DeclaredNode;
use crate::model::AnalysisResult;
use std::fmt;
use std::str::FromStr;

/// Which relationship graph to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    Causation,
    EntityRelations,
    EventRelations,
}

impl GraphKind {
    pub const ALL: [GraphKind; 3] = [
        GraphKind::Causation,
        GraphKind::EntityRelations,
        GraphKind::EventRelations,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            GraphKind::Causation => "causation",
            GraphKind::EntityRelations => "entity-relations",
            GraphKind::EventRelations => "event-relations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GraphKind::Causation => "Causation Graph",
            GraphKind::EntityRelations => "Entity Relations Graph",
            GraphKind::EventRelations => "Event Relations Graph",
        }
    }

    /// Shown instead of an empty canvas.
    pub fn empty_message(&self) -> &'static str {
        match self {
            GraphKind::Causation => "No causation relations found.",
            GraphKind::EntityRelations => "No entity relations found.",
            GraphKind::EventRelations => "No event relations found.",
        }
    }

    pub fn build(&self, result: &AnalysisResult) -> GraphData {
        match self {
            GraphKind::Causation => causation_graph(result),
            GraphKind::EntityRelations => entity_relations_graph(result),
            GraphKind::EventRelations => event_relations_graph(result),
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GraphKind::ALL
            .into_iter()
            .find(|k| k.id() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| {
                format!(
                    "unknown graph '{}' (expected one of: causation, entity-relations, event-relations)",
                    s
                )
            })
    }
}

/// Causation graph: declared occurrences first, then any occurrence only
/// named by a relation. An occurrence without a summary is `event-<index>`.
pub fn causation_graph(result: &AnalysisResult) -> GraphData {
    let declared = result
        .causation
        .events_causation
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let id = if event.occurrence_summary.is_empty() {
                format!("event-{}", index)
            } else {
                event.occurrence_summary.clone()
            };
            DeclaredNode::new(id, event.occurrence_summary.clone())
        });

    build_graph(declared, &result.causation.causation_relations, &CAUSATION_ENDPOINTS)
}

/// Entity relation graph: nodes come from the relations themselves.
pub fn entity_relations_graph(result: &AnalysisResult) -> GraphData {
    build_graph(
        std::iter::empty(),
        &result.entity_relations,
        &ENTITY_RELATION_ENDPOINTS,
    )
}

/// Event relation graph: declared event ids labelled by their summaries.
pub fn event_relations_graph(result: &AnalysisResult) -> GraphData {
    let declared = result
        .event_relations
        .events
        .iter()
        .map(|event| DeclaredNode::new(event.id.clone(), event.summary.clone()));

    build_graph(declared, &result.event_relations.relations, &EVENT_RELATION_ENDPOINTS)
}
