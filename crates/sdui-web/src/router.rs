//! Router construction for the server-driven UI server.

use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::routes;
use crate::state::ServerState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Anything that is neither a route nor a file gets the plain 404.
    let assets = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(routes::static_files::not_found.into_service());

    Router::new()
        .route("/", get(routes::status::help))
        .route("/help", get(routes::status::help))
        .route("/api", get(routes::status::help))
        .route("/api/help", get(routes::status::help))
        .route("/status", get(routes::status::status))
        .route("/api/status", get(routes::status::status))
        .route(
            "/api/server",
            get(routes::api::server_action)
                .post(routes::api::server_action)
                .put(routes::api::server_action),
        )
        .route("/ws", get(routes::ws::ws_handler))
        .fallback_service(assets)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
