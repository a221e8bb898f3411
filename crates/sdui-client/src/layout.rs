//! Layout cache and installation into the content container.

use sdui_types::templates;
use serde_json::Value;

use crate::dom::{Document, NodeId};
use crate::templates::TemplateRegistry;

/// Tag of the layout root; a container whose first element has this tag
/// already holds a layout.
pub const LAYOUT_ROOT_TAG: &str = "main";

/// Holds one detached instance of the panel layout and hands out deep
/// clones, so every `show-panel` starts from empty flow zones.
#[derive(Debug, Default)]
pub struct LayoutCache {
    pristine: Option<NodeId>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh clone of the layout; `None` if no layout template exists.
    pub fn fresh(&mut self, doc: &mut Document, templates: &TemplateRegistry) -> Option<NodeId> {
        let pristine = match self.pristine {
            Some(node) => node,
            None => {
                let node = templates.instantiate(doc, templates::PANEL_LAYOUT, &Value::Null)?;
                self.pristine = Some(node);
                node
            }
        };
        doc.clone_subtree(pristine)
    }
}

/// Put `layout` into `container`: replace (and free) the previous layout
/// root if the first element child is one, otherwise prepend.
pub fn install(doc: &mut Document, container: NodeId, layout: NodeId) {
    match doc.first_element_child(container) {
        Some(first) if doc.tag(first) == Some(LAYOUT_ROOT_TAG) => {
            if doc.replace_child(container, first, layout) {
                doc.remove(first);
            }
        }
        _ => {
            doc.prepend_child(container, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clones_are_distinct() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        let mut cache = LayoutCache::new();
        let a = cache.fresh(&mut doc, &registry).unwrap();
        let b = cache.fresh(&mut doc, &registry).unwrap();
        assert_ne!(a, b);
        assert_eq!(doc.outline(a), doc.outline(b));
    }

    #[test]
    fn test_install_prepends_then_replaces() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        let container = doc.create_element("div");
        let footer = doc.create_element("footer");
        doc.append_child(container, footer);

        let mut cache = LayoutCache::new();
        let first = cache.fresh(&mut doc, &registry).unwrap();
        install(&mut doc, container, first);
        assert_eq!(doc.children(container), &[first, footer]);

        let second = cache.fresh(&mut doc, &registry).unwrap();
        install(&mut doc, container, second);
        assert_eq!(doc.children(container), &[second, footer]);
        assert_eq!(doc.parent(first), None);
        assert!(!doc.contains(first));
        assert!(doc.contains(footer));
    }

    #[test]
    fn test_no_layout_template() {
        let registry = TemplateRegistry::new();
        let mut doc = Document::new();
        assert!(LayoutCache::new().fresh(&mut doc, &registry).is_none());
    }
}
