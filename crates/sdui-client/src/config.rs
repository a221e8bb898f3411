//! Client configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `SDUI_SERVER_URL` | `ws://localhost:3000` |
//! | `SDUI_HTTP_URL` | `http://localhost:3000` |
//! | `SDUI_RECONNECT_DELAY_MS` | `2000` |
//! | `SDUI_RECONNECT_ATTEMPTS` | `5` |

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::channel::ReconnectPolicy;

pub const SERVER_URL_VAR: &str = "SDUI_SERVER_URL";
pub const HTTP_URL_VAR: &str = "SDUI_HTTP_URL";
pub const RECONNECT_DELAY_VAR: &str = "SDUI_RECONNECT_DELAY_MS";
pub const RECONNECT_ATTEMPTS_VAR: &str = "SDUI_RECONNECT_ATTEMPTS";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket base URL; `/ws?instance=...` is appended.
    pub server_url: String,
    /// HTTP base URL for `/api/server` and `/status`.
    pub http_url: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:3000".to_string(),
            http_url: "http://localhost:3000".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(SERVER_URL_VAR) {
            config.server_url = value;
        }
        if let Some(value) = get(HTTP_URL_VAR) {
            config.http_url = value;
        }
        if let Some(value) = get(RECONNECT_DELAY_VAR) {
            let millis: u64 = parse(RECONNECT_DELAY_VAR, &value)?;
            config.reconnect.delay = Duration::from_millis(millis);
        }
        if let Some(value) = get(RECONNECT_ATTEMPTS_VAR) {
            config.reconnect.max_attempts = parse(RECONNECT_ATTEMPTS_VAR, &value)?;
        }

        Ok(config)
    }

    /// Socket URL for `instance`, with the instance percent-encoded.
    pub fn socket_url(&self, instance: &str) -> Result<String, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            var: SERVER_URL_VAR,
            value: self.server_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.server_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("ws");
        url.query_pairs_mut().append_pair("instance", instance);
        Ok(url.into())
    }

    pub fn http_base(&self) -> &str {
        self.http_url.trim_end_matches('/')
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.reconnect.delay, Duration::from_millis(2000));
        assert_eq!(config.reconnect.max_attempts, 5);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SDUI_SERVER_URL", "ws://10.0.0.5:9000/"),
            ("SDUI_RECONNECT_DELAY_MS", "250"),
            ("SDUI_RECONNECT_ATTEMPTS", "2"),
        ]))
        .unwrap();
        assert_eq!(
            config.socket_url("session-1:trek").unwrap(),
            "ws://10.0.0.5:9000/ws?instance=session-1%3Atrek"
        );
        assert_eq!(config.reconnect.delay, Duration::from_millis(250));
        assert_eq!(config.reconnect.max_attempts, 2);
    }

    #[test]
    fn test_socket_url_encodes_instance() {
        let config = ClientConfig::default();
        let instance = "a&b=c #1%:trek";
        let url = Url::parse(&config.socket_url(instance).unwrap()).unwrap();
        assert_eq!(url.path(), "/ws");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("instance".to_string(), instance.to_string())]);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_socket_url_rejects_bad_base() {
        let config = ClientConfig {
            server_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.socket_url("s1"),
            Err(ConfigError::Invalid {
                var: "SDUI_SERVER_URL",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_delay() {
        let error =
            ClientConfig::from_lookup(lookup(&[("SDUI_RECONNECT_DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                var: "SDUI_RECONNECT_DELAY_MS",
                ..
            }
        ));
    }
}
