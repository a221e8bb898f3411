use sdui_types::{flow, templates, Step};
use serde_json::json;

use super::{fan_out, follow_ancestor_chain, panel_value, PanelBuilder};
use crate::graph::{link_kind, panel_kind, GraphStore, Panel};

/// Renders `card` panels: title, content, description, child cards, parent
/// breadcrumb and cross-links to directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardBuilder;

impl PanelBuilder for CardBuilder {
    fn kind(&self) -> &'static str {
        panel_kind::CARD
    }

    fn build(&self, panel: &Panel, graph: &GraphStore) -> Vec<Step> {
        let mut steps = vec![
            Step::new(
                templates::TITLE,
                json!({ "title": panel.name }),
                flow::INSIDE_TOP_CENTER,
            ),
            Step::new(templates::CONTENT_HTML, panel_value(panel), flow::INSIDE_FOCUS),
            Step::new(
                templates::CENTERED_TEXT,
                json!({ "text": panel.description }),
                flow::INSIDE_BOTTOM_CENTER,
            ),
        ];

        steps.extend(fan_out(
            graph,
            &panel.id,
            link_kind::CHILD_CARD,
            flow::INSIDE_RIGHT_MIDDLE,
        ));
        steps.extend(follow_ancestor_chain(
            graph,
            &panel.id,
            link_kind::PARENT_CARD,
            flow::OUTSIDE_LEFT_UPPER,
        ));
        steps.extend(fan_out(
            graph,
            &panel.id,
            link_kind::DIRECTORY,
            flow::OUTSIDE_RIGHT_LOWER,
        ));

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::sample_graph;

    #[test]
    fn test_home_card_fans_out_children() {
        let graph = sample_graph().unwrap();
        let steps = CardBuilder.build(graph.get_panel("home-card").unwrap(), &graph);

        assert_eq!(steps[0].template, templates::TITLE);
        assert_eq!(steps[0].data["title"], "home card");
        assert_eq!(steps[1].template, templates::CONTENT_HTML);
        assert_eq!(steps[2].data["text"], "Start here.");

        let children: Vec<&str> = steps
            .iter()
            .filter(|s| s.flow == flow::INSIDE_RIGHT_MIDDLE)
            .map(|s| s.data["to"].as_str().unwrap())
            .collect();
        assert_eq!(children, vec!["browse-card", "protocol-card", "apps-card"]);
        assert!(steps.iter().all(|s| s.flow != flow::OUTSIDE_LEFT_UPPER));
    }

    #[test]
    fn test_browse_card_has_parent_and_directory_links() {
        let graph = sample_graph().unwrap();
        let steps = CardBuilder.build(graph.get_panel("browse-card").unwrap(), &graph);

        let parents: Vec<&Step> = steps
            .iter()
            .filter(|s| s.flow == flow::OUTSIDE_LEFT_UPPER)
            .collect();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].data["to"], "home-card");

        let directories: Vec<&Step> = steps
            .iter()
            .filter(|s| s.flow == flow::OUTSIDE_RIGHT_LOWER)
            .collect();
        assert_eq!(directories.len(), 1);
        assert_eq!(directories[0].data["to"], "workspace");
        assert_eq!(
            directories[0]
                .click_action
                .as_ref()
                .map(|c| c.action.as_str()),
            Some("select-panel")
        );
    }
}
