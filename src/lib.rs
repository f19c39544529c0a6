//! Anasi: client for a narrative-analysis NLP service
//!
//! Submits text (or loads a pre-computed analysis file), normalizes the
//! structured result and exposes it through a tabbed, text-rendered viewer.
//!
//! # Core Concepts
//!
//! - **AnalysisResult**: the normalized, immutable record of one analysis
//! - **Graphs**: causation, entity-relation and event-relation views derived
//!   from relation lists by one parameterized builder
//! - **Session**: the single owner of viewer state, observed through a watch channel
//! - **History**: the five most recent results, persisted in SQLite
//!
//! # Example
//!
//! ```
//! use anasi::{normalize, GraphKind};
//! use serde_json::json;
//!
//! let result = normalize(&json!({
//!     "summary": "s",
//!     "events": [],
//!     "entity_relations": [{"source_entity": "A", "target_entity": "B", "relation": "knows"}]
//! }));
//! let graph = GraphKind::EntityRelations.build(&result);
//! assert_eq!(graph.nodes.len(), 2);
//! ```

pub mod config;
pub mod graph;
pub mod history;
pub mod model;
pub mod service;
pub mod session;
pub mod view;

pub use config::{Config, ConfigError};
pub use graph::{build_graph, EndpointFields, GraphData, GraphEdge, GraphKind, GraphNode, NodeId};
pub use history::{
    HistoryEntry, HistoryError, HistoryResult, HistoryStore, OpenStore, SqliteHistoryStore,
};
pub use model::{
    merge_submission, normalize, parse_upload, validate_upload, AnalysisResult, ModelError,
    Submission,
};
pub use service::{AnalysisService, Endpoints, HttpClient, MockService, ServiceError};
pub use session::{Session, SessionError, SessionResult, SessionState};
pub use view::{render_tab, EventsView, Tab, TabController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
