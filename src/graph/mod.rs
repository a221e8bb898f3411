//! Panel graph
//!
//! A small, read-only graph of panels (nodes) and typed directional links
//! (edges). Panels are rendered by a builder selected by their `kind`; links
//! are walked by the builders to decide what else appears on a panel.
//!
//! ```text
//!   home-card ──child-card──► browse-card ──directory──► workspace
//!       ▲                          │                        │
//!       └────────parent-card───────┘               sub-directory (fan-out)
//!                                                           ▼
//!                                                         crates ──parent-directory──► workspace
//! ```

mod sample;
mod store;

pub use sample::{graph as sample_graph, SAMPLE_GRAPH_JSON};
pub use store::GraphStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Panel kinds with a standard builder.
pub mod panel_kind {
    pub const DIRECTORY: &str = "directory";
    pub const CARD: &str = "card";
}

/// Link kinds used by the standard builders.
pub mod link_kind {
    /// Points from a directory to its parent directory (single).
    pub const PARENT_DIRECTORY: &str = "parent-directory";
    pub const SUB_DIRECTORY: &str = "sub-directory";
    pub const CHILD_CARD: &str = "child-card";
    /// Points from a card (or directory) to its parent card (single).
    pub const PARENT_CARD: &str = "parent-card";
    /// Cross-link from a card to its filesystem analog.
    pub const DIRECTORY: &str = "directory";
}

/// A node in the panel graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

impl Panel {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            description: String::new(),
            content: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// A typed, directional edge. Extra fields (label, description, ...) are
/// carried through to the client untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub kind: String,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl Link {
    pub fn new(kind: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            from: from.into(),
            to: to.into(),
            meta: Map::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Display text for the link: `label`, falling back to the target id.
    pub fn label(&self) -> &str {
        self.meta
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or(&self.to)
    }
}

/// One entry of a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "isa", rename_all = "lowercase")]
pub enum Element {
    Panel(Panel),
    Link(Link),
}

/// Serialized form of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub graph_name: String,
    #[serde(rename = "rootId")]
    pub root_id: String,
    pub elements: Vec<Element>,
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to read graph document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse graph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate panel id '{id}'")]
    DuplicatePanel { id: String },

    #[error("Root panel '{id}' not found")]
    MissingRoot { id: String },
}
