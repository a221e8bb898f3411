//! SDUI - Server-Driven UI Core
//!
//! The server keeps per-session state and a small graph of panels, and
//! answers client actions with an ordered array of commands the client
//! replays against its node tree.
//!
//! ## Call Chain
//! All transports converge on the same path:
//! Transport -> normalize -> Dispatcher -> app handler -> PanelBuilders -> Command[]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdui::{graph, normalize, CallMethod, Dispatcher};
//! use sdui_types::InstanceAddress;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), sdui::GraphError> {
//! let dispatcher = Dispatcher::standard(graph::sample_graph()?);
//! let address = InstanceAddress::parse("session-abc123:default");
//! let input = normalize(Some(json!({"action": "show-app"})), &[], CallMethod::WebSocket);
//! let commands = dispatcher.dispatch(&address, input).await;
//! assert_eq!(commands[0].name(), "show-status");
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Panel graph (read-only at runtime)
pub mod graph;

// Instance -> session -> app state
pub mod session;

// Action resolution and request normalization
pub mod dispatch;

// Panel kind -> render steps
pub mod panels;

// Built-in apps: default, trek, dream
pub mod apps;

pub use dispatch::{
    normalize, normalize_message, ActionContext, ActionHandler, ActionKind, App, AppCatalog,
    CallMethod, Dispatcher, HandlerTable, NormalizedInput, Services,
};
pub use error::ActionError;
pub use graph::{GraphError, GraphStore};
pub use panels::{PanelBuilder, PanelBuilders};
pub use session::{ActivePanel, AppState, Session, SessionHandle, SessionRegistry};

pub use sdui_types as types;
