//! Static assets with a plain-text 404.

use axum::http::StatusCode;

pub const NOT_FOUND_MESSAGE: &str = "Sorry, the page you are looking for does not exist.";

/// Answer for anything that is neither a route nor a file.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}
