//! Configuration management for the Lattice API server

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a TOML/JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse(path.as_ref(), &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let config: Config = if path.extension().map_or(false, |ext| ext == "toml") {
            toml::from_str(content)
                .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))?
        } else {
            serde_json::from_str(content)
                .map_err(|e| Error::Config(format!("Failed to parse JSON config: {}", e)))?
        };

        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind_address: String,
    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Address to listen on. IPv6 addresses may be given with or without
    /// brackets.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self
            .bind_address
            .trim_start_matches('[')
            .trim_end_matches(']');
        let ip: IpAddr = host.parse().map_err(|e| {
            Error::Config(format!("Invalid bind address {:?}: {}", self.bind_address, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Credential schemes the API server knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` against a token file
    Bearer,
    /// Shared secret in the `API_KEY` header
    ApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Required value of the `API_KEY` header. Empty or unset disables the scheme.
    pub api_key: Option<String>,
    /// Path to a `token,username` file enabling the bearer scheme
    pub token_file: Option<PathBuf>,
    /// Let requests without any credentials through as anonymous
    pub allow_anonymous: bool,
    /// Order in which schemes are consulted
    pub order: Vec<AuthScheme>,
}

impl AuthConfig {
    /// The configured API key, if it is set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token_file: None,
            allow_anonymous: false,
            order: vec![AuthScheme::Bearer, AuthScheme::ApiKey],
        }
    }
}
