//! HTTP fallback channel
//!
//! Strictly request/response: one action in, one command array out. Also
//! carries the one-shot `/status` probe.

use sdui_types::{ActionMessage, StatusResponse};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

pub const INSTANCE_HEADER: &str = "Instance";

#[derive(Debug, Clone)]
pub struct HttpChannel {
    client: reqwest::Client,
    base_url: String,
    instance: String,
}

impl HttpChannel {
    pub fn new(base_url: &str, instance: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// `POST /api/server`; returns the raw command array.
    pub async fn send(&self, action: &ActionMessage) -> Result<Vec<Value>> {
        let url = format!("{}/api/server", self.base_url);
        debug!("POST {} action={}", url, action.action);

        let commands = self
            .client
            .post(&url)
            .header(INSTANCE_HEADER, &self.instance)
            .json(action)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Value>>()
            .await?;
        Ok(commands)
    }

    /// `GET /status`.
    pub async fn probe(&self) -> Result<StatusResponse> {
        let url = format!("{}/status", self.base_url);
        let status = self
            .client
            .get(&url)
            .header(INSTANCE_HEADER, &self.instance)
            .send()
            .await?
            .error_for_status()?
            .json::<StatusResponse>()
            .await?;
        Ok(status)
    }
}
