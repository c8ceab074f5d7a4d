//! Process settings loaded via OrthoConfig.
//!
//! Values come from `REGISTRY_*` environment variables, an optional
//! configuration file, and command-line flags, in OrthoConfig's usual order.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings for the HTTP server and its storage backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRY")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it users are kept in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Emit human-readable logs instead of JSON.
    #[ortho_config(default = false)]
    pub log_plain: bool,
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
