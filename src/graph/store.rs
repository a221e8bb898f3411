//! Read-only lookups over the panel graph.
//!
//! All queries are linear scans; the element set is small and fixed once
//! loaded. Absence is reported as `None` / empty, never as an error.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use super::{Element, GraphDocument, GraphError, Link, Panel};

#[derive(Debug, Clone)]
pub struct GraphStore {
    name: String,
    panels: Vec<Panel>,
    /// Insertion order is the fan-out order.
    links: Vec<Link>,
    root_index: usize,
}

impl GraphStore {
    /// Build a store, checking that panel ids are unique and the root exists.
    ///
    /// Links whose endpoints are unknown are kept (lookups through them
    /// degrade to the root at render time) but logged.
    pub fn new(
        name: impl Into<String>,
        root_id: &str,
        elements: Vec<Element>,
    ) -> Result<Self, GraphError> {
        let mut panels = Vec::new();
        let mut links = Vec::new();
        let mut seen = HashSet::new();

        for element in elements {
            match element {
                Element::Panel(panel) => {
                    if !seen.insert(panel.id.clone()) {
                        return Err(GraphError::DuplicatePanel { id: panel.id });
                    }
                    panels.push(panel);
                }
                Element::Link(link) => links.push(link),
            }
        }

        let root_index = panels
            .iter()
            .position(|p| p.id == root_id)
            .ok_or_else(|| GraphError::MissingRoot {
                id: root_id.to_string(),
            })?;

        for link in &links {
            for end in [&link.from, &link.to] {
                if !seen.contains(end) {
                    warn!(
                        "Link {} -> {} ({}) references unknown panel '{}'",
                        link.from, link.to, link.kind, end
                    );
                }
            }
        }

        Ok(Self {
            name: name.into(),
            panels,
            links,
            root_index,
        })
    }

    pub fn from_document(document: GraphDocument) -> Result<Self, GraphError> {
        Self::new(document.graph_name, &document.root_id, document.elements)
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Load a graph document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        info!(
            "Loaded graph '{}' from {} ({} panels, {} links)",
            store.name,
            path.display(),
            store.panels.len(),
            store.links.len()
        );
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_id(&self) -> &str {
        &self.get_root().id
    }

    pub fn get_panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// First link of `kind` leaving `from`; used for single-parent walks.
    pub fn get_link(&self, from: &str, kind: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.from == from && l.kind == kind)
    }

    /// Every link of `kind` leaving `from`, in insertion order.
    pub fn get_links(&self, from: &str, kind: &str) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| l.from == from && l.kind == kind)
            .collect()
    }

    pub fn get_root(&self) -> &Panel {
        &self.panels[self.root_index]
    }

    /// The panel with `id`, or the root when it does not resolve.
    pub fn get_panel_or_root(&self, id: &str) -> &Panel {
        self.get_panel(id).unwrap_or_else(|| self.get_root())
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}
