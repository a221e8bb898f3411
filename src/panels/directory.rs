use sdui_types::{flow, templates, Step};
use serde_json::json;

use super::{fan_out, follow_ancestor_chain, panel_value, PanelBuilder};
use crate::graph::{link_kind, panel_kind, GraphStore, Panel};

/// Number of placeholder file entries shown in a directory.
pub const MOCK_FILE_COUNT: usize = 7;

/// Renders `directory` panels: focus header, sub-directories, parent
/// breadcrumb, related cards and mock files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryBuilder;

impl PanelBuilder for DirectoryBuilder {
    fn kind(&self) -> &'static str {
        panel_kind::DIRECTORY
    }

    fn build(&self, panel: &Panel, graph: &GraphStore) -> Vec<Step> {
        let data = panel_value(panel);
        let mut steps = vec![
            Step::new(
                templates::DIRECTORY_FOCUS_LEFT,
                data.clone(),
                flow::INSIDE_TOP_LEFT,
            ),
            Step::new(templates::DIRECTORY_FOCUS_RIGHT, data, flow::INSIDE_TOP_RIGHT),
        ];

        steps.extend(fan_out(
            graph,
            &panel.id,
            link_kind::SUB_DIRECTORY,
            flow::INSIDE_LEFT_LOWER,
        ));
        steps.extend(follow_ancestor_chain(
            graph,
            &panel.id,
            link_kind::PARENT_DIRECTORY,
            flow::OUTSIDE_LEFT_UPPER,
        ));
        steps.extend(fan_out(
            graph,
            &panel.id,
            link_kind::PARENT_CARD,
            flow::OUTSIDE_LEFT_LOWER,
        ));

        steps.extend((0..MOCK_FILE_COUNT).map(|i| {
            Step::new(
                templates::FILE_LINK,
                json!({ "filename": format!("file_{}.txt", i) }),
                flow::INSIDE_FOCUS,
            )
        }));

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::sample_graph;

    #[test]
    fn test_one_step_per_sub_directory_in_link_order() {
        let graph = sample_graph().unwrap();
        let panel = graph.get_panel("crates").unwrap();
        let steps = DirectoryBuilder.build(panel, &graph);

        let expected: Vec<&str> = graph
            .get_links("crates", link_kind::SUB_DIRECTORY)
            .iter()
            .map(|l| l.to.as_str())
            .collect();
        let actual: Vec<&str> = steps
            .iter()
            .filter(|s| s.flow == flow::INSIDE_LEFT_LOWER)
            .map(|s| s.data["to"].as_str().unwrap())
            .collect();

        assert_eq!(actual, expected);
        assert_eq!(actual.len(), 3);
    }

    #[test]
    fn test_step_layout_for_nested_directory() {
        let graph = sample_graph().unwrap();
        let panel = graph.get_panel("sdui-web").unwrap();
        let steps = DirectoryBuilder.build(panel, &graph);

        assert_eq!(steps[0].template, templates::DIRECTORY_FOCUS_LEFT);
        assert_eq!(steps[0].data["id"], "sdui-web");
        assert_eq!(steps[1].template, templates::DIRECTORY_FOCUS_RIGHT);

        let breadcrumb: Vec<&str> = steps
            .iter()
            .filter(|s| s.flow == flow::OUTSIDE_LEFT_UPPER)
            .map(|s| s.data["to"].as_str().unwrap())
            .collect();
        assert_eq!(breadcrumb, vec!["workspace", "crates"]);

        let files: Vec<&Step> = steps
            .iter()
            .filter(|s| s.template == templates::FILE_LINK)
            .collect();
        assert_eq!(files.len(), MOCK_FILE_COUNT);
        assert_eq!(files[0].data["filename"], "file_0.txt");
        assert!(files.iter().all(|s| s.flow == flow::INSIDE_FOCUS));
    }

    #[test]
    fn test_root_directory_links_its_card() {
        let graph = sample_graph().unwrap();
        let steps = DirectoryBuilder.build(graph.get_root(), &graph);
        let cards: Vec<&Step> = steps
            .iter()
            .filter(|s| s.flow == flow::OUTSIDE_LEFT_LOWER)
            .collect();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].data["to"], "browse-card");
    }
}
