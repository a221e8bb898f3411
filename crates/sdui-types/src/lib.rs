//! Shared wire types for the server-driven UI channel
//!
//! This crate is the SINGLE SOURCE OF TRUTH for everything crossing the
//! action/command channel, whichever transport carries it.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  action   ┌──────────────────┐
//! │  Client          │ ────────► │  Server          │
//! │  (interpreter)   │ ◄──────── │  (dispatcher)    │
//! └──────────────────┘ [command] └──────────────────┘
//!          WebSocket (preferred) or HTTP (fallback)
//! ```
//!
//! ## Rules
//!
//! 1. A response is always a JSON array of commands, even for one command.
//! 2. Commands are tagged by their `command` field, actions by `action`.
//! 3. Wire keys are kebab-case (`click-action`, `call-method`).

pub mod action;
pub mod api;
pub mod command;
pub mod flow;
pub mod instance;
pub mod templates;

pub use action::ActionMessage;
pub use api::{HelpEndpoints, HelpResponse, StatusResponse};
pub use command::{ClickAction, Command, Course, Step};
pub use instance::{InstanceAddress, DEFAULT_NAME, INSTANCE_DELIMITER};
