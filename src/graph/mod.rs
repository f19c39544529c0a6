//! Relationship graphs: uniform node/edge data built from relation lists

mod builder;
mod edge;
mod node;
mod views;


pub use builder::{
    build_graph, EndpointFields, GraphData, CAUSATION_ENDPOINTS, ENTITY_RELATION_ENDPOINTS,
    EVENT_RELATION_ENDPOINTS,
};
pub use edge::GraphEdge;
pub use node::{DeclaredNode, GraphNode, NodeId};
pub use views::{causation_graph, entity_relations_graph, event_relations_graph, GraphKind};
