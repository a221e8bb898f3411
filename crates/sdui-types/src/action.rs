//! Client → server action messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{ "action": <name>, ...fields }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMessage {
    pub action: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ActionMessage {
    /// Field name holding the action; never a data key.
    pub const ACTION_KEY: &'static str = "action";

    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: Map::new(),
        }
    }

    /// Ignores [`Self::ACTION_KEY`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a data field. Returns false, leaving the message unchanged, for
    /// the reserved action key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if key == Self::ACTION_KEY {
            return false;
        }
        self.data.insert(key, value.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_flatten_beside_action() {
        let message = ActionMessage::new("select-panel").with("id", "server");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"action": "select-panel", "id": "server"}));
    }

    #[test]
    fn test_action_key_is_not_data() {
        let mut message = ActionMessage::new("select-panel").with("action", "other");
        assert!(!message.insert("action", "again"));
        assert!(message.insert("id", "src"));
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json.matches("\"action\"").count(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&json).unwrap(),
            json!({"action": "select-panel", "id": "src"})
        );
    }

    #[test]
    fn test_parse_keeps_extra_fields() {
        let message: ActionMessage =
            serde_json::from_str(r#"{"action":"set-course","dir":3,"warp":1.5}"#).unwrap();
        assert_eq!(message.action, "set-course");
        assert_eq!(message.data.get("dir"), Some(&json!(3)));
        assert!(!message.data.contains_key("action"));
    }
}
