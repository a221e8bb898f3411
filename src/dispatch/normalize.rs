//! Request normalization
//!
//! HTTP requests (query string + JSON body) and WebSocket messages (JSON
//! text) converge here into one [`NormalizedInput`] before any handler sees
//! them.
//!
//! Precedence, lowest to highest: body fields, then query fields. Query keys
//! containing [`PATH_DELIMITER`] build nested objects (`a.b=1` becomes
//! `{"a": {"b": "1"}}`). The originating method is stored under
//! [`CALL_METHOD_KEY`].

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ActionError;

pub const CALL_METHOD_KEY: &str = "call-method";
pub const ACTION_KEY: &str = "action";
pub const DEBUG_KEY: &str = "debug";
pub const PATH_DELIMITER: char = '.';

/// Transport method an action arrived by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
    Put,
    WebSocket,
    Other,
}

impl CallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMethod::Get => "GET",
            CallMethod::Post => "POST",
            CallMethod::Put => "PUT",
            CallMethod::WebSocket => "WEBSOCKET",
            CallMethod::Other => "OTHER",
        }
    }

    /// Map an HTTP method name; anything unrecognized is `Other`.
    pub fn from_http(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => CallMethod::Get,
            "POST" => CallMethod::Post,
            "PUT" => CallMethod::Put,
            _ => CallMethod::Other,
        }
    }
}

impl fmt::Display for CallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-independent request data handed to action handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    data: Map<String, Value>,
    method: CallMethod,
}

impl NormalizedInput {
    pub fn method(&self) -> CallMethod {
        self.method
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn action(&self) -> Option<&str> {
        self.data
            .get(ACTION_KEY)
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
    }

    /// String or number field rendered as text.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric field, accepting numeric strings (query values are strings).
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ActionError> {
        match self.data.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ActionError::invalid_input(key, format!("'{}' is not a number", s))),
            Some(other) => Err(ActionError::invalid_input(
                key,
                format!("expected a number, got {}", other),
            )),
        }
    }

    pub fn is_debug(&self) -> bool {
        self.data.contains_key(DEBUG_KEY)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Merge body and query into one input.
///
/// A body that is not a JSON object contributes nothing.
pub fn normalize(
    body: Option<Value>,
    query: &[(String, String)],
    method: CallMethod,
) -> NormalizedInput {
    let mut data = match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for (key, value) in query {
        insert_path(&mut data, key, Value::String(value.clone()));
    }

    data.insert(
        CALL_METHOD_KEY.to_string(),
        Value::String(method.as_str().to_string()),
    );

    NormalizedInput { data, method }
}

/// Parse a WebSocket text frame into normalized input.
pub fn normalize_message(text: &str) -> Result<NormalizedInput, ActionError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ActionError::MalformedMessage(e.to_string()))?;
    if !value.is_object() {
        return Err(ActionError::MalformedMessage(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(normalize(Some(value), &[], CallMethod::WebSocket))
}

/// Set `value` at the dotted `path`, creating (or overwriting non-object)
/// intermediate entries.
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split(PATH_DELIMITER).peekable();
    let mut current = target;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_wins_over_body() {
        let input = normalize(
            Some(json!({"action": "show-app", "id": "body"})),
            &q(&[("id", "query")]),
            CallMethod::Post,
        );
        assert_eq!(input.get("id"), Some(&json!("query")));
        assert_eq!(input.action(), Some("show-app"));
    }

    #[test]
    fn test_dotted_keys_nest() {
        let input = normalize(None, &q(&[("a.b", "1"), ("a.c.d", "2")]), CallMethod::Get);
        assert_eq!(input.get("a"), Some(&json!({"b": "1", "c": {"d": "2"}})));
    }

    #[test]
    fn test_dotted_key_replaces_scalar() {
        let input = normalize(Some(json!({"a": 5})), &q(&[("a.b", "1")]), CallMethod::Get);
        assert_eq!(input.get("a"), Some(&json!({"b": "1"})));
    }

    #[test]
    fn test_dotted_key_merges_into_body_object() {
        let input = normalize(
            Some(json!({"a": {"keep": true}})),
            &q(&[("a.b", "1")]),
            CallMethod::Put,
        );
        assert_eq!(input.get("a"), Some(&json!({"keep": true, "b": "1"})));
    }

    #[test]
    fn test_records_call_method() {
        let input = normalize(None, &[], CallMethod::Put);
        assert_eq!(input.get(CALL_METHOD_KEY), Some(&json!("PUT")));
        let input = normalize_message(r#"{"action":"show-app"}"#).unwrap();
        assert_eq!(input.get(CALL_METHOD_KEY), Some(&json!("WEBSOCKET")));
    }

    #[test]
    fn test_non_object_body_ignored() {
        let input = normalize(Some(json!([1, 2])), &[], CallMethod::Post);
        assert_eq!(input.data().len(), 1);
        assert!(input.action().is_none());
    }

    #[test]
    fn test_malformed_message_rejected() {
        assert!(matches!(
            normalize_message("not json"),
            Err(ActionError::MalformedMessage(_))
        ));
        assert!(matches!(
            normalize_message("[1]"),
            Err(ActionError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_get_f64_accepts_strings_and_numbers() {
        let input = normalize(
            Some(json!({"warp": 2.5, "bad": "x"})),
            &q(&[("dir", "3")]),
            CallMethod::Get,
        );
        assert_eq!(input.get_f64("dir").unwrap(), Some(3.0));
        assert_eq!(input.get_f64("warp").unwrap(), Some(2.5));
        assert_eq!(input.get_f64("missing").unwrap(), None);
        assert!(input.get_f64("bad").is_err());
    }

    #[test]
    fn test_empty_action_is_missing() {
        let input = normalize(Some(json!({"action": ""})), &[], CallMethod::Post);
        assert!(input.action().is_none());
    }

    proptest! {
        #[test]
        fn prop_nested_path_reachable(
            segments in prop::collection::vec("[a-z]{1,6}", 1..5),
            value in "[a-z0-9]{0,8}",
        ) {
            let key = segments.join(".");
            let input = normalize(None, &[(key, value.clone())], CallMethod::Get);
            let mut current = input.to_value();
            for segment in &segments {
                current = current.get(segment).cloned().unwrap_or(Value::Null);
            }
            prop_assert_eq!(current, Value::String(value));
        }
    }
}
