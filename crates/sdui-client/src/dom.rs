//! Retained node tree
//!
//! A small arena-backed document: element and text nodes, attributes, a
//! hidden flag, and just enough selector support (`tag`, `#id`, `.class`,
//! `[attr]`, `[attr="value"]`, compounded) for templates and click actions.
//!
//! Only nodes reachable from the root are observable. Replaced subtrees are
//! freed with [`Document::remove`]; a freed id reads as an empty, detached
//! node and its slot is reused without aliasing.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
        };
        doc.root = doc.create_element("body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// False once `id` has been removed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(Node {
            kind,
            parent: None,
            children: Vec::new(),
            hidden: false,
        })
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    fn attrs_mut(&mut self, id: NodeId) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            NodeKind::Text(_) => None,
        }
    }

    /// No-op on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(attrs) = self.attrs_mut(id) {
            attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(attrs) = self.attrs_mut(id) {
            attrs.remove(name);
        }
    }

    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    /// Add (`on`) or remove a class.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        let mut classes: Vec<String> = self.classes(id).into_iter().map(String::from).collect();
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_string());
        } else if !on && present {
            classes.retain(|c| c != class);
        } else {
            return;
        }
        if classes.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", classes.join(" "));
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.hidden)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.hidden = hidden;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// First child that is an element (skips text nodes).
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).iter().copied().find(|c| !self.is_text(*c))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Remove `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Detach `id` and free it with all its descendants. The root is never
    /// removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(node) = self.nodes.remove(node) {
                stack.extend(node.children);
            }
        }
    }

    /// Returns false (and changes nothing) if `child` contains `parent`
    /// or either node is gone.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_child(parent, child, None)
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_child(parent, child, Some(0))
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, at: Option<usize>) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        self.detach(child);
        let children = &mut self.nodes[parent].children;
        match at {
            Some(index) => children.insert(index.min(children.len()), child),
            None => children.push(child),
        }
        self.nodes[child].parent = Some(parent);
        true
    }

    /// Put `new` where `old` is among `parent`'s children. `old` is left
    /// detached, not freed.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        if old == new {
            return self.parent(old) == Some(parent);
        }
        if !self.contains(new) || self.is_ancestor_or_self(new, parent) {
            return false;
        }
        if !self.children(parent).contains(&old) {
            return false;
        }
        // `new` may have been an earlier sibling.
        self.detach(new);
        let Some(index) = self.children(parent).iter().position(|c| *c == old) else {
            return false;
        };
        self.nodes[parent].children[index] = new;
        self.nodes[new].parent = Some(parent);
        self.nodes[old].parent = None;
        true
    }

    /// Deep copy of `id`; the copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.nodes.get(id)?;
        let kind = source.kind.clone();
        let hidden = source.hidden;
        let children = source.children.clone();

        let copy = self.push(kind);
        self.nodes[copy].hidden = hidden;
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.nodes[child_copy].parent = Some(copy);
                self.nodes[copy].children.push(child_copy);
            }
        }
        Some(copy)
    }

    /// Nodes below `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Attached element whose `id` attribute equals `element_id`.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|n| self.attr(*n, "id") == Some(element_id))
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Element { .. }) => self
                .children(id)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
            None => String::new(),
        }
    }

    /// Indented text rendering of the subtree at `id`; hidden subtrees
    /// are collapsed.
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(id, 0, &mut out);
        out
    }

    fn write_outline(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.kind(id) {
            Some(NodeKind::Text(text)) => {
                let _ = writeln!(out, "{}{:?}", indent, text);
            }
            Some(NodeKind::Element { tag, attrs }) => {
                let _ = write!(out, "{}<{}", indent, tag);
                for (name, value) in attrs {
                    let _ = write!(out, " {}=\"{}\"", name, value);
                }
                if self.is_hidden(id) {
                    let _ = writeln!(out, " hidden>");
                    return;
                }
                let _ = writeln!(out, ">");
                for child in self.children(id) {
                    self.write_outline(*child, depth + 1, out);
                }
            }
            None => {}
        }
    }
}

/// A compound selector: optional tag, then any of `#id`, `.class`,
/// `[attr]`, `[attr="value"]`. Combinators are not supported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn parse(input: &str) -> Option<Self> {
        let mut rest = input.trim();
        if rest.is_empty() {
            return None;
        }

        let mut selector = Selector::default();
        if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        } else {
            let (tag, after) = take_ident(rest);
            if !tag.is_empty() {
                selector.tag = Some(tag.to_ascii_lowercase());
            }
            rest = after;
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let (ident, after) = take_ident(&rest[1..]);
                    if ident.is_empty() {
                        return None;
                    }
                    if c == '#' {
                        selector.id = Some(ident.to_string());
                    } else {
                        selector.classes.push(ident.to_string());
                    }
                    rest = after;
                }
                '[' => {
                    let end = rest.find(']')?;
                    let inner = &rest[1..end];
                    let (name, value) = match inner.split_once('=') {
                        Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
                        None => (inner.trim(), None),
                    };
                    if name.is_empty() {
                        return None;
                    }
                    selector.attrs.push((name.to_string(), value));
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(selector)
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(tag) = doc.tag(id) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if tag != expected {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if doc.attr(id, "id") != Some(expected.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(id, c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(value) => doc.attr(id, name) == Some(value.as_str()),
            None => doc.attr(id, name).is_some(),
        })
    }
}

fn take_ident(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    s.split_at(end)
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    value.to_string()
}
