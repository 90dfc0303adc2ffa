//! GSBot configuration structures to map the gsbot.toml configuration.

#![deny(missing_docs)]

mod chat;
mod cors;
mod loader;

use std::{borrow::Cow, net::SocketAddr, path::Path};

pub use chat::{ChatConfig, ErrorSignaling, ProviderConfig, ProvidersConfig};
pub use cors::{AnyOrList, CorsConfig};
use serde::Deserialize;

/// Main configuration structure for the GSBot service.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat relay configuration settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Parse configuration from a TOML string, expanding `{{ env.NAME }}` templates.
    pub fn parse(content: &str) -> anyhow::Result<Config> {
        loader::parse(content)
    }
}

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS configuration. Permissive when not set.
    pub cors: Option<CorsConfig>,
}

/// Health endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is enabled.
    pub enabled: bool,
    /// The path for the health endpoint.
    pub path: Cow<'static, str>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            enabled: true,
            path: Cow::Borrowed("/health"),
        }
    }
}
