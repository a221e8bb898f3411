//! Client view state
//!
//! Owns the node tree and everything the interpreter mutates: the content
//! container, the connectivity indicator, click listeners, the grid flag
//! and the local diagnostics list.

use std::collections::HashMap;
use std::fmt;

use sdui_types::{ActionMessage, ClickAction, Step};
use serde_json::Value;
use tracing::{info, warn};

use crate::dom::{Document, NodeId, Selector};
use crate::layout::{self, LayoutCache};
use crate::templates::TemplateRegistry;

pub const STATUS_INDICATOR_ID: &str = "status-indicator";
pub const CONTENT_ID: &str = "content";
pub const CONSOLE_ID: &str = "console";

/// Class toggled on every flow zone by the grid overlay.
pub const GRID_CLASS: &str = "show-grid";
/// Sub-element that receives a click listener when no selector is given.
pub const TARGET_CLASS: &str = "target";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    WebSocket,
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::WebSocket => write!(f, "websocket"),
            Transport::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected(Transport),
    Disconnected,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Connected(transport) => write!(f, "Connected ({})", transport),
            Connectivity::Disconnected => write!(f, "Disconnected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct ClientView {
    doc: Document,
    templates: TemplateRegistry,
    layout: LayoutCache,
    content: NodeId,
    indicator: NodeId,
    console: NodeId,
    listeners: HashMap<NodeId, ClickAction>,
    diagnostics: Vec<Diagnostic>,
    connectivity: Connectivity,
    instance: Option<String>,
    show_grid: bool,
}

impl ClientView {
    /// A page with an indicator, a console line and an empty content
    /// container.
    pub fn new(templates: TemplateRegistry) -> Self {
        let mut doc = Document::new();
        let root = doc.root();

        let indicator = doc.create_element("div");
        doc.set_attr(indicator, "id", STATUS_INDICATOR_ID);
        let console = doc.create_element("pre");
        doc.set_attr(console, "id", CONSOLE_ID);
        let content = doc.create_element("div");
        doc.set_attr(content, "id", CONTENT_ID);
        for node in [indicator, console, content] {
            doc.append_child(root, node);
        }

        let mut view = Self {
            doc,
            templates,
            layout: LayoutCache::new(),
            content,
            indicator,
            console,
            listeners: HashMap::new(),
            diagnostics: Vec::new(),
            connectivity: Connectivity::Disconnected,
            instance: None,
            show_grid: false,
        };
        view.refresh_indicator();
        view
    }

    pub fn standard() -> Self {
        Self::new(TemplateRegistry::standard())
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Instance id from the last `show-status`.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, on: bool) {
        self.show_grid = on;
        self.refresh_grid();
    }

    pub fn toggle_grid(&mut self) {
        self.set_show_grid(!self.show_grid);
    }

    pub fn is_content_visible(&self) -> bool {
        !self.doc.is_hidden(self.content)
    }

    pub fn console_text(&self) -> String {
        self.doc.text_content(self.console)
    }

    pub fn outline(&self) -> String {
        self.doc.outline(self.doc.root())
    }

    // ── Diagnostics ───────────────────────────────────────────────

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Info,
            message,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warn,
            message,
        });
    }

    // ── Indicator / console ───────────────────────────────────────

    pub fn set_connectivity(&mut self, connectivity: Connectivity) {
        self.connectivity = connectivity;
        self.refresh_indicator();
    }

    pub fn set_instance(&mut self, instance: impl Into<String>) {
        let instance = instance.into();
        self.doc
            .set_attr(self.indicator, "data-instance", instance.clone());
        self.instance = Some(instance);
    }

    fn refresh_indicator(&mut self) {
        let text = self.connectivity.to_string();
        replace_text(&mut self.doc, self.indicator, text);
    }

    pub fn set_console(&mut self, text: impl Into<String>) {
        replace_text(&mut self.doc, self.console, text.into());
    }

    // ── Panels ────────────────────────────────────────────────────

    pub fn clear_panel(&mut self) {
        self.doc.set_hidden(self.content, true);
    }

    /// Install a fresh layout and render `steps` into it, in order.
    pub fn show_panel(&mut self, steps: &[Step]) {
        self.doc.set_hidden(self.content, false);

        let Some(layout) = self.layout.fresh(&mut self.doc, &self.templates) else {
            self.warn(format!(
                "Missing template: {}",
                sdui_types::templates::PANEL_LAYOUT
            ));
            return;
        };
        layout::install(&mut self.doc, self.content, layout);

        let doc = &self.doc;
        self.listeners.retain(|node, _| doc.is_attached(*node));

        for step in steps {
            self.render_step(step);
        }
        self.refresh_grid();
    }

    fn render_step(&mut self, step: &Step) {
        let Some(zone) = self.doc.get_element_by_id(&step.flow) else {
            self.warn(format!("flow not found: {}", step.flow));
            return;
        };

        let node = match self
            .templates
            .instantiate(&mut self.doc, &step.template, &step.data)
        {
            Some(node) => node,
            None => {
                self.warn(format!("Missing template: {}", step.template));
                self.fallback_node(step)
            }
        };
        self.doc.append_child(zone, node);

        if let Some(action) = &step.click_action {
            let target = self.listener_target(node, action.selector.as_deref());
            self.listeners.insert(target, action.clone());
        }
    }

    /// Visible stand-in for a step whose template is not registered.
    fn fallback_node(&mut self, step: &Step) -> NodeId {
        let text = match step.data.get("arg").and_then(Value::as_str) {
            Some(arg) if !arg.is_empty() => arg.to_string(),
            _ => format!("Missing template: {}", step.template),
        };
        let node = self.doc.create_element("div");
        self.doc.set_attr(node, "class", "missing-template");
        let text = self.doc.create_text(text);
        self.doc.append_child(node, text);
        node
    }

    fn listener_target(&mut self, node: NodeId, selector: Option<&str>) -> NodeId {
        match selector {
            Some(selector) => {
                let matches_self =
                    Selector::parse(selector).is_some_and(|s| s.matches(&self.doc, node));
                if matches_self {
                    return node;
                }
                match self.doc.query_selector(node, selector) {
                    Some(found) => found,
                    None => {
                        self.warn(format!(
                            "Click selector {} matched nothing; listening on the step root",
                            selector
                        ));
                        node
                    }
                }
            }
            None => {
                let target = format!(".{}", TARGET_CLASS);
                self.doc.query_selector(node, &target).unwrap_or(node)
            }
        }
    }

    fn refresh_grid(&mut self) {
        let zones: Vec<NodeId> = self
            .doc
            .descendants(self.content)
            .into_iter()
            .filter(|n| self.doc.has_class(*n, "flow"))
            .collect();
        for zone in zones {
            self.doc.set_class(zone, GRID_CLASS, self.show_grid);
        }
    }

    // ── Clicks ────────────────────────────────────────────────────

    /// Attached nodes carrying a click listener, in document order.
    pub fn clickable(&self) -> Vec<NodeId> {
        self.doc
            .descendants(self.doc.root())
            .into_iter()
            .filter(|n| self.listeners.contains_key(n))
            .collect()
    }

    pub fn click_action(&self, node: NodeId) -> Option<&ClickAction> {
        self.listeners.get(&node)
    }

    /// Simulate a click on `node`, bubbling to the nearest ancestor with a
    /// listener. Returns the action to send, if any listener fired.
    pub fn click(&mut self, node: NodeId) -> Option<ActionMessage> {
        if !self.doc.is_attached(node) || self.doc.is_hidden(self.content) {
            return None;
        }
        let mut current = Some(node);
        let action = loop {
            let id = current?;
            if let Some(action) = self.listeners.get(&id) {
                break action.clone();
            }
            current = self.doc.parent(id);
        };

        let mut message = ActionMessage::new(action.action.clone());
        for (key, value) in &action.data {
            let resolved = match value
                .as_str()
                .and_then(|s| s.strip_prefix(ClickAction::SELECTOR_MARKER))
            {
                Some(selector) => self.read_value(selector),
                None => value.clone(),
            };
            if !message.insert(key.as_str(), resolved) {
                self.warn(format!(
                    "Click data key '{}' is reserved; dropped from {}",
                    key, action.action
                ));
            }
        }
        Some(message)
    }

    /// Current value of the element matching `selector`: its `value`
    /// attribute, else its text.
    fn read_value(&mut self, selector: &str) -> Value {
        match self.doc.query_selector(self.doc.root(), selector) {
            Some(node) => match self.doc.attr(node, "value") {
                Some(value) => Value::String(value.to_string()),
                None => Value::String(self.doc.text_content(node)),
            },
            None => {
                self.warn(format!("No element matches {}", selector));
                Value::Null
            }
        }
    }

    /// Set the `value` attribute of the element matching `selector`, as if
    /// the user had typed into it.
    pub fn input(&mut self, selector: &str, value: &str) -> bool {
        match self.doc.query_selector(self.doc.root(), selector) {
            Some(node) => {
                self.doc.set_attr(node, "value", value);
                true
            }
            None => false,
        }
    }
}

fn replace_text(doc: &mut Document, node: NodeId, text: String) {
    for child in doc.children(node).to_vec() {
        doc.remove(child);
    }
    let text = doc.create_text(text);
    doc.append_child(node, text);
}
