//! Server → client commands.
//!
//! A command array is replayed by the client strictly in order; the order
//! of `show-panel` steps is the order in which flow zones are filled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single instruction emitted by the server.
///
/// Serialized as `{ "command": "<kind>", ...payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    /// User-visible warning; surfaced to client diagnostics only.
    Warn { message: String },
    /// Informational message; surfaced to client diagnostics only.
    Log { message: String },
    /// Connectivity indicator update carrying the bare instance id.
    ShowStatus { instance: String },
    /// Hide the main content region.
    ClearPanel,
    /// Replace the layout root and render `steps` into its flow zones.
    ShowPanel { steps: Vec<Step> },
    /// Echo of the normalized request, appended when `debug` is present.
    Debug { data: Value },
    ShowTrekWelcome { message: String },
    ShowTrekInfo {
        #[serde(rename = "isActive")]
        is_active: bool,
        stardate: String,
        status: String,
        course: Course,
    },
}

impl Command {
    pub fn warn(message: impl Into<String>) -> Self {
        Command::Warn {
            message: message.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Command::Log {
            message: message.into(),
        }
    }

    pub fn show_status(instance: impl Into<String>) -> Self {
        Command::ShowStatus {
            instance: instance.into(),
        }
    }

    pub fn show_panel(steps: Vec<Step>) -> Self {
        Command::ShowPanel { steps }
    }

    /// Wire name of this command (the value of its `command` field).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Warn { .. } => "warn",
            Command::Log { .. } => "log",
            Command::ShowStatus { .. } => "show-status",
            Command::ClearPanel => "clear-panel",
            Command::ShowPanel { .. } => "show-panel",
            Command::Debug { .. } => "debug",
            Command::ShowTrekWelcome { .. } => "show-trek-welcome",
            Command::ShowTrekInfo { .. } => "show-trek-info",
        }
    }
}

/// One render instruction inside a `show-panel` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Template id registered on the client.
    pub template: String,
    /// Template input.
    #[serde(default)]
    pub data: Value,
    /// Flow zone id in the current layout.
    pub flow: String,
    #[serde(
        rename = "click-action",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub click_action: Option<ClickAction>,
}

impl Step {
    pub fn new(template: impl Into<String>, data: Value, flow: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            data,
            flow: flow.into(),
            click_action: None,
        }
    }

    pub fn with_click_action(mut self, click_action: ClickAction) -> Self {
        self.click_action = Some(click_action);
        self
    }
}

/// Action sent back to the server when the rendered step is clicked.
///
/// String values in `data` that start with [`ClickAction::SELECTOR_MARKER`]
/// are selectors; the client replaces them with the current value of the
/// matching element before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickAction {
    pub action: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Sub-element of the rendered step that receives the listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl ClickAction {
    pub const SELECTOR_MARKER: char = '$';

    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: Map::new(),
            selector: None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }
}

/// Ship course in the trek app.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Compass direction in `[1, 9)`; 1 is east, 3 is north.
    pub dir: f64,
    /// Warp factor in `[0, 8]`.
    pub warp: f64,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            dir: 1.0,
            warp: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_command_serializes_tag_only() {
        let value = serde_json::to_value(Command::ClearPanel).unwrap();
        assert_eq!(value, json!({"command": "clear-panel"}));
    }

    #[test]
    fn test_step_uses_kebab_click_action_key() {
        let step = Step::new("nav-button", json!({"value": "Go"}), "inside-bottom-center")
            .with_click_action(ClickAction::new("open-panel").with("panel", "page2"));
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["click-action"]["action"], "open-panel");
        assert_eq!(value["click-action"]["data"]["panel"], "page2");
        assert!(value["click-action"].get("selector").is_none());
    }

    #[test]
    fn test_step_without_click_action_omits_key() {
        let step = Step::new("text", json!({"arg": "x"}), "inside-focus");
        let value = serde_json::to_value(&step).unwrap();
        assert!(value.get("click-action").is_none());
    }

    #[test]
    fn test_trek_info_field_names() {
        let command = Command::ShowTrekInfo {
            is_active: true,
            stardate: "00:00:03".into(),
            status: "ok".into(),
            course: Course::default(),
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["command"], "show-trek-info");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["course"]["warp"], 0.01);
    }

    #[test]
    fn test_name_matches_wire_tag() {
        let commands = vec![
            Command::warn("w"),
            Command::log("l"),
            Command::show_status("i"),
            Command::ClearPanel,
            Command::show_panel(vec![]),
            Command::Debug { data: json!({}) },
        ];
        for command in commands {
            let value = serde_json::to_value(&command).unwrap();
            assert_eq!(value["command"], command.name());
        }
    }
}
