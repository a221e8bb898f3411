//! Panel Command Builder
//!
//! Turns one [`Panel`] into the ordered [`Step`] list of a `show-panel`
//! command by walking the panel graph. One [`PanelBuilder`] is registered
//! per panel `kind`.
//!
//! Two walks are shared by every builder:
//!
//! - [`follow_ancestor_chain`]: repeatedly follow the single parent-typed
//!   link, then emit the hops root-most first (breadcrumb order).
//! - [`fan_out`]: one step per link of a kind, in graph insertion order.
//!
//! Steps targeting the same flow zone accumulate on the client; their
//! relative order here is their render order.

mod card;
mod directory;

pub use card::CardBuilder;
pub use directory::DirectoryBuilder;

use std::collections::{HashMap, HashSet};

use sdui_types::{templates, ClickAction, Command, Step};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ActionError;
use crate::graph::{GraphStore, Link, Panel};

/// Action attached to every link step.
pub const SELECT_PANEL_ACTION: &str = "select-panel";

/// Builds the steps for panels of one kind.
pub trait PanelBuilder: Send + Sync {
    fn kind(&self) -> &'static str;

    fn build(&self, panel: &Panel, graph: &GraphStore) -> Vec<Step>;
}

/// Builders keyed by panel kind.
#[derive(Default)]
pub struct PanelBuilders {
    builders: HashMap<&'static str, Box<dyn PanelBuilder>>,
}

impl PanelBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory and card builders.
    pub fn standard() -> Self {
        let mut builders = Self::new();
        builders.register(DirectoryBuilder);
        builders.register(CardBuilder);
        builders
    }

    /// Register a builder, replacing any previous one for the same kind.
    pub fn register<B: PanelBuilder + 'static>(&mut self, builder: B) {
        self.builders.insert(builder.kind(), Box::new(builder));
    }

    pub fn get(&self, kind: &str) -> Option<&dyn PanelBuilder> {
        self.builders.get(kind).map(|b| b.as_ref())
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.builders.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// The `show-panel` command for `panel`.
    pub fn render(&self, panel: &Panel, graph: &GraphStore) -> Result<Command, ActionError> {
        let builder = self.get(&panel.kind).ok_or_else(|| {
            warn!("No panel builder registered: {}", panel.kind);
            ActionError::UnknownBuilder {
                kind: panel.kind.clone(),
            }
        })?;

        debug!(
            "Building show-panel command for {}: {}",
            panel.kind, panel.name
        );
        Ok(Command::show_panel(builder.build(panel, graph)))
    }
}

/// Walk single parent links from `from`, returning one link step per hop,
/// root-most first.
///
/// A hop back to an already visited panel ends the walk.
pub fn follow_ancestor_chain(graph: &GraphStore, from: &str, kind: &str, flow: &str) -> Vec<Step> {
    let mut stack = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(from);

    let mut current = from;
    while let Some(link) = graph.get_link(current, kind) {
        if !visited.insert(link.to.as_str()) {
            warn!(
                "Cycle in '{}' links at {} -> {}; stopping walk from {}",
                kind, link.from, link.to, from
            );
            break;
        }
        stack.push(link_step(link, flow));
        current = &link.to;
    }

    stack.reverse();
    stack
}

/// One link step per `kind` link leaving `from`.
pub fn fan_out(graph: &GraphStore, from: &str, kind: &str, flow: &str) -> Vec<Step> {
    graph
        .get_links(from, kind)
        .into_iter()
        .map(|link| link_step(link, flow))
        .collect()
}

/// A `link` step that selects the link target when clicked.
pub fn link_step(link: &Link, flow: &str) -> Step {
    Step::new(templates::LINK, link_value(link), flow)
        .with_click_action(ClickAction::new(SELECT_PANEL_ACTION).with("id", link.to.as_str()))
}

fn link_value(link: &Link) -> Value {
    let mut data = link.meta.clone();
    data.insert("kind".into(), Value::String(link.kind.clone()));
    data.insert("from".into(), Value::String(link.from.clone()));
    data.insert("to".into(), Value::String(link.to.clone()));
    Value::Object(data)
}

/// The panel itself as template data.
pub(crate) fn panel_value(panel: &Panel) -> Value {
    let mut data = Map::new();
    data.insert("id".into(), Value::String(panel.id.clone()));
    data.insert("kind".into(), Value::String(panel.kind.clone()));
    data.insert("name".into(), Value::String(panel.name.clone()));
    data.insert(
        "description".into(),
        Value::String(panel.description.clone()),
    );
    data.insert("content".into(), Value::String(panel.content.clone()));
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{link_kind, panel_kind, Element};

    fn chain_graph() -> GraphStore {
        GraphStore::new(
            "chain",
            "c",
            vec![
                Element::Panel(Panel::new("a", panel_kind::DIRECTORY, "a")),
                Element::Panel(Panel::new("b", panel_kind::DIRECTORY, "b")),
                Element::Panel(Panel::new("c", panel_kind::DIRECTORY, "c")),
                Element::Link(Link::new(link_kind::PARENT_DIRECTORY, "a", "b")),
                Element::Link(Link::new(link_kind::PARENT_DIRECTORY, "b", "c")),
            ],
        )
        .unwrap()
    }

    fn targets(steps: &[Step]) -> Vec<&str> {
        steps
            .iter()
            .map(|s| s.data["to"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_ancestor_chain_is_root_most_first() {
        let graph = chain_graph();
        let steps = follow_ancestor_chain(&graph, "a", link_kind::PARENT_DIRECTORY, "zone");
        assert_eq!(targets(&steps), vec!["c", "b"]);
        assert!(steps.iter().all(|s| s.flow == "zone"));
    }

    #[test]
    fn test_ancestor_chain_empty_without_parent() {
        let graph = chain_graph();
        assert!(follow_ancestor_chain(&graph, "c", link_kind::PARENT_DIRECTORY, "z").is_empty());
    }

    #[test]
    fn test_ancestor_chain_stops_on_cycle() {
        let graph = GraphStore::new(
            "cycle",
            "a",
            vec![
                Element::Panel(Panel::new("a", panel_kind::CARD, "a")),
                Element::Panel(Panel::new("b", panel_kind::CARD, "b")),
                Element::Link(Link::new(link_kind::PARENT_CARD, "a", "b")),
                Element::Link(Link::new(link_kind::PARENT_CARD, "b", "a")),
            ],
        )
        .unwrap();
        let steps = follow_ancestor_chain(&graph, "a", link_kind::PARENT_CARD, "z");
        assert_eq!(targets(&steps), vec!["b"]);
    }

    #[test]
    fn test_link_step_selects_target() {
        let link = Link::new(link_kind::CHILD_CARD, "a", "b").with_meta("label", "B");
        let step = link_step(&link, "zone");
        assert_eq!(step.template, templates::LINK);
        assert_eq!(step.data["label"], "B");
        assert_eq!(step.data["kind"], link_kind::CHILD_CARD);
        let click = step.click_action.unwrap();
        assert_eq!(click.action, SELECT_PANEL_ACTION);
        assert_eq!(click.data.get("id"), Some(&Value::from("b")));
    }

    #[test]
    fn test_unknown_builder_is_an_error() {
        let graph = chain_graph();
        let panel = Panel::new("g", "gallery", "gallery");
        let result = PanelBuilders::standard().render(&panel, &graph);
        assert_eq!(
            result,
            Err(ActionError::UnknownBuilder {
                kind: "gallery".into()
            })
        );
    }

    #[test]
    fn test_standard_kinds() {
        assert_eq!(PanelBuilders::standard().kinds(), vec!["card", "directory"]);
    }
}
