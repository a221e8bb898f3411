//! Built-in sample graph used when no graph document is configured.

use super::{GraphError, GraphStore};

pub const SAMPLE_GRAPH_JSON: &str = include_str!("sample_graph.json");

pub fn graph() -> Result<GraphStore, GraphError> {
    GraphStore::from_json(SAMPLE_GRAPH_JSON)
}
