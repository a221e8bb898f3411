//! Template registry
//!
//! A template turns step data into a detached node subtree. Missing data
//! fields render as empty strings; instantiation only fails when the id is
//! not registered.

use std::collections::BTreeMap;

use sdui_types::{flow, templates};
use serde_json::Value;

use crate::dom::{Document, NodeId};

pub type TemplateFn = Box<dyn Fn(&mut Document, &Value) -> NodeId + Send + Sync>;

#[derive(Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateFn>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.ids())
            .finish()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every template the bundled apps emit, plus the panel layout.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(templates::PANEL_LAYOUT, |doc, _| panel_layout(doc));
        registry.register(templates::LINK, |doc, data| {
            let label = field(data, "label");
            let label = if label.is_empty() { field(data, "to") } else { label };
            let node = element(doc, "div", "link");
            let anchor = element(doc, "a", "target");
            let description = field(data, "description");
            if !description.is_empty() {
                doc.set_attr(anchor, "title", description);
            }
            append_text(doc, anchor, label);
            doc.append_child(node, anchor);
            node
        });
        registry.register(templates::FILE_LINK, |doc, data| {
            let node = element(doc, "div", "file-link");
            let anchor = element(doc, "a", "target");
            append_text(doc, anchor, field(data, "filename"));
            doc.append_child(node, anchor);
            node
        });
        registry.register(templates::TITLE, |doc, data| {
            text_element(doc, "h1", "title-1", field(data, "title"))
        });
        // Markup is kept verbatim as text; the tree does not parse HTML.
        registry.register(templates::CONTENT_HTML, |doc, data| {
            text_element(doc, "div", "content-html", field(data, "content"))
        });
        registry.register(templates::CENTERED_TEXT, |doc, data| {
            text_element(doc, "p", "centered-text-1", field(data, "text"))
        });
        registry.register(templates::DIRECTORY_FOCUS_LEFT, |doc, data| {
            let node = element(doc, "div", "directory-focus-left");
            let heading = text_element(doc, "h2", "directory-name", field(data, "name"));
            doc.append_child(node, heading);
            node
        });
        registry.register(templates::DIRECTORY_FOCUS_RIGHT, |doc, data| {
            let node = element(doc, "div", "directory-focus-right");
            let body = text_element(
                doc,
                "p",
                "directory-description",
                field(data, "description"),
            );
            doc.append_child(node, body);
            node
        });
        registry.register(templates::TEXT, |doc, data| {
            text_element(doc, "span", "text", field(data, "arg"))
        });
        registry.register(templates::NAV_BUTTON, |doc, data| {
            let value = field(data, "value");
            let node = text_element(doc, "button", "nav-button", value.clone());
            doc.set_attr(node, "value", value);
            node
        });
        registry.register(templates::TEXT_INPUT, |doc, data| {
            let node = element(doc, "input", "text-input");
            doc.set_attr(node, "type", "text");
            for key in ["name", "value", "placeholder"] {
                doc.set_attr(node, key, field(data, key));
            }
            node
        });
        registry
    }

    pub fn register<F>(&mut self, id: impl Into<String>, template: F)
    where
        F: Fn(&mut Document, &Value) -> NodeId + Send + Sync + 'static,
    {
        self.templates.insert(id.into(), Box::new(template));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// `None` when `id` is not registered.
    pub fn instantiate(&self, doc: &mut Document, id: &str, data: &Value) -> Option<NodeId> {
        let template = self.templates.get(id)?;
        Some(template(doc, data))
    }
}

/// `main.panel-layout` holding one `div.flow` per zone of the standard grid.
fn panel_layout(doc: &mut Document) -> NodeId {
    let main = element(doc, "main", "panel-layout");
    for zone in flow::ALL {
        let node = element(doc, "div", "flow");
        doc.set_attr(node, "id", zone);
        doc.append_child(main, node);
    }
    main
}

fn field(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn element(doc: &mut Document, tag: &str, class: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.set_attr(node, "class", class);
    node
}

fn text_element(doc: &mut Document, tag: &str, class: &str, text: String) -> NodeId {
    let node = element(doc, tag, class);
    append_text(doc, node, text);
    node
}

fn append_text(doc: &mut Document, parent: NodeId, text: String) {
    let node = doc.create_text(text);
    doc.append_child(parent, node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_has_every_zone() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        let layout = registry
            .instantiate(&mut doc, templates::PANEL_LAYOUT, &Value::Null)
            .unwrap();
        assert_eq!(doc.tag(layout), Some("main"));
        assert_eq!(doc.children(layout).len(), flow::ALL.len());
        for zone in flow::ALL {
            assert!(doc.query_selector(layout, &format!("div.flow#{}", zone)).is_some());
        }
    }

    #[test]
    fn test_link_falls_back_to_target_id() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        let node = registry
            .instantiate(&mut doc, templates::LINK, &json!({"to": "src"}))
            .unwrap();
        let target = doc.query_selector(node, ".target").unwrap();
        assert_eq!(doc.text_content(target), "src");

        let node = registry
            .instantiate(&mut doc, templates::LINK, &json!({"to": "src", "label": "Sources"}))
            .unwrap();
        assert_eq!(doc.text_content(node), "Sources");
    }

    #[test]
    fn test_text_input_attributes() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        let node = registry
            .instantiate(
                &mut doc,
                templates::TEXT_INPUT,
                &json!({"name": "test-input", "value": "Default Value"}),
            )
            .unwrap();
        assert_eq!(doc.attr(node, "name"), Some("test-input"));
        assert_eq!(doc.attr(node, "value"), Some("Default Value"));
        assert_eq!(doc.attr(node, "placeholder"), Some(""));
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::standard();
        let mut doc = Document::new();
        assert!(registry.instantiate(&mut doc, "hologram", &json!({})).is_none());
        assert!(!registry.contains("hologram"));
    }
}
