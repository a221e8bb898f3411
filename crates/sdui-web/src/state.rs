//! Shared application state
//!
//! One dispatcher (and with it the session registry) per process, handed to
//! every route through axum's `State`.

use std::sync::Arc;
use std::time::Instant;

use sdui::Dispatcher;

use crate::config::ServerConfig;
use crate::connections::ConnectionRegistry;

#[derive(Clone)]
pub struct ServerState {
    pub dispatcher: Arc<Dispatcher>,
    pub connections: ConnectionRegistry,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

impl ServerState {
    pub fn new(dispatcher: Dispatcher, config: ServerConfig) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            connections: ConnectionRegistry::new(),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
