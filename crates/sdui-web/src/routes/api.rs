//! HTTP action endpoint: `GET|POST|PUT /api/server`
//!
//! Strictly request/response. The body is always a JSON command array with
//! status 200; failures are reported as `warn` commands inside it.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method},
    Json,
};
use sdui::{normalize, ActionError, CallMethod};
use sdui_types::{Command, InstanceAddress};
use serde_json::Value;
use tracing::warn;

use super::{query_instance, raw_instance};
use crate::state::ServerState;

pub async fn server_action(
    State(state): State<ServerState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Json<Vec<Command>> {
    let raw = raw_instance(&headers, query_instance(&query));
    let address = InstanceAddress::parse(&raw);

    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected {} body from {}: {}", method, raw, e);
            return Json(vec![e.into_command()]);
        }
    };

    let input = normalize(body, &query, CallMethod::from_http(method.as_str()));
    Json(state.dispatcher.dispatch(&address, input).await)
}

/// Empty bodies are absent; anything else must be JSON.
fn parse_body(body: &Bytes) -> Result<Option<Value>, ActionError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ActionError::MalformedMessage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_absent() {
        assert_eq!(parse_body(&Bytes::new()).unwrap(), None);
        assert_eq!(parse_body(&Bytes::from_static(b"  \n")).unwrap(), None);
    }

    #[test]
    fn test_invalid_body_is_malformed() {
        assert!(matches!(
            parse_body(&Bytes::from_static(b"{oops")),
            Err(ActionError::MalformedMessage(_))
        ));
    }
}
