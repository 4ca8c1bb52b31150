use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::protocol::response::DEFAULT_CHARSET;
use crate::protocol::status::SERVER_STATUS_AUTOCOMMIT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Server-side defaults handed to new sessions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Version string advertised in the greeting
    pub server_version: String,
    /// Default character set before the handshake negotiates one
    pub charset: u8,
    /// Whether sessions start with autocommit enabled
    pub autocommit: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_version: "8.0.0-hestia".to_string(),
            charset: DEFAULT_CHARSET,
            autocommit: true,
        }
    }
}

impl ServerConfig {
    /// Initial server status flags derived from the config
    pub fn status_flags(&self) -> u16 {
        if self.autocommit {
            SERVER_STATUS_AUTOCOMMIT
        } else {
            0
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}
