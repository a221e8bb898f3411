//! Headless server-driven UI client
//!
//! The client owns no application logic. It keeps a retained node tree,
//! replays the server's command arrays into it and turns clicks back into
//! actions.
//!
//! - [`dom`]: arena node tree with compound selectors
//! - [`templates`]: template id → node factory
//! - [`view`] / [`interpreter`]: command replay and click handling
//! - [`channel`] / [`transport`]: reconnecting WebSocket channel
//! - [`http`]: request/response fallback and the `/status` probe

pub mod channel;
pub mod config;
pub mod dom;
pub mod error;
pub mod http;
pub mod instance;
pub mod interpreter;
pub mod layout;
pub mod templates;
pub mod transport;
pub mod view;

pub use channel::{ChannelMachine, ChannelState, CloseOutcome, ReconnectPolicy};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use http::HttpChannel;
pub use instance::InstanceIds;
pub use interpreter::Interpreter;
pub use templates::TemplateRegistry;
pub use transport::{ClientEvent, SocketClient};
pub use view::{ClientView, Connectivity, Diagnostic, DiagnosticLevel, Transport};
