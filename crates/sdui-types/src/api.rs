//! Plain HTTP responses outside the command channel.

use serde::{Deserialize, Serialize};

/// `GET /help`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: HelpEndpoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpEndpoints {
    pub help: String,
    pub status: String,
    pub server: String,
    pub socket: String,
}

/// `GET /status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub environment: String,
    /// Raw instance string as received.
    pub instance: String,
}
