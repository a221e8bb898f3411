//! SDUI Web Server
//!
//! axum entry points into the core dispatcher:
//!
//! - `GET|POST|PUT /api/server`: one action in, one command array out
//! - `GET /ws?instance=<id>[:<app>]`: the preferred, long-lived channel
//! - `GET /status`, `GET /help`: plain JSON
//! - everything else: static assets, then a plain-text 404

pub mod config;
pub mod connections;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use connections::{ConnectionRegistry, Outbound};
pub use router::build_router;
pub use state::ServerState;
