pub mod api;
pub mod static_files;
pub mod status;
pub mod ws;

use axum::http::HeaderMap;
use sdui_types::DEFAULT_NAME;

/// Header carrying the raw instance string on HTTP requests.
pub const INSTANCE_HEADER: &str = "instance";
pub const INSTANCE_PARAM: &str = "instance";

/// Raw instance string: the `Instance` header, else the `instance` query
/// value, else `"default"`.
pub fn raw_instance(headers: &HeaderMap, query: Option<&str>) -> String {
    headers
        .get(INSTANCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or(query.filter(|v| !v.is_empty()))
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

/// First `instance` value among query pairs.
pub fn query_instance(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(k, _)| k == INSTANCE_PARAM)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_wins_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert(INSTANCE_HEADER, HeaderValue::from_static("h1:trek"));
        assert_eq!(raw_instance(&headers, Some("q1")), "h1:trek");
    }

    #[test]
    fn test_query_then_default() {
        let headers = HeaderMap::new();
        assert_eq!(raw_instance(&headers, Some("q1")), "q1");
        assert_eq!(raw_instance(&headers, None), "default");
        assert_eq!(raw_instance(&headers, Some("")), "default");
    }
}
