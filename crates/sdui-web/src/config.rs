//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `SDUI_BIND_ADDR` | `0.0.0.0:3000` (or `0.0.0.0:$PORT`) |
//! | `SDUI_STATIC_DIR` | `public` |
//! | `SDUI_GRAPH_PATH` | built-in sample graph |
//! | `SDUI_ENVIRONMENT` | `development` |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "SDUI_BIND_ADDR";
pub const PORT_VAR: &str = "PORT";
pub const STATIC_DIR_VAR: &str = "SDUI_STATIC_DIR";
pub const GRAPH_PATH_VAR: &str = "SDUI_GRAPH_PATH";
pub const ENVIRONMENT_VAR: &str = "SDUI_ENVIRONMENT";

const DEFAULT_PORT: u16 = 3000;

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
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub graph_path: Option<PathBuf>,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            static_dir: PathBuf::from("public"),
            graph_path: None,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
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

        if let Some(value) = get(BIND_ADDR_VAR) {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: BIND_ADDR_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        } else if let Some(value) = get(PORT_VAR) {
            let port: u16 = value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: PORT_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }

        if let Some(value) = get(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(value);
        }
        config.graph_path = get(GRAPH_PATH_VAR).map(PathBuf::from);
        if let Some(value) = get(ENVIRONMENT_VAR) {
            config.environment = value;
        }

        Ok(config)
    }
}
