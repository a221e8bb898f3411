//! `/help` and `/status`

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use sdui_types::{HelpEndpoints, HelpResponse, StatusResponse};

use super::{query_instance, raw_instance};
use crate::state::ServerState;

pub const SERVER_NAME: &str = "sdui-web";

pub async fn help() -> Json<HelpResponse> {
    Json(HelpResponse {
        name: SERVER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Server-driven UI: send actions, receive ordered command arrays".to_string(),
        endpoints: HelpEndpoints {
            help: "GET /help".to_string(),
            status: "GET /status".to_string(),
            server: "GET|POST|PUT /api/server".to_string(),
            socket: "GET /ws?instance=<id>[:<app>]".to_string(),
        },
    })
}

pub async fn status(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: SERVER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.uptime_secs(),
        environment: state.config.environment.clone(),
        instance: raw_instance(&headers, query_instance(&query)),
    })
}
