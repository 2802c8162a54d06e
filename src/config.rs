//! Configuration management
//!
//! This module handles loading configuration from TOML files. Every section
//! is optional; a missing file means defaults everywhere.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpClient;
use crate::router::{Router, DEFAULT_WAIT_SECS};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Router address and credentials
    #[serde(default)]
    pub router: RouterConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Reconnect settings
    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RouterConfig {
    /// Router address, e.g. "192.168.0.1"
    #[serde(default)]
    pub host: Option<String>,

    /// Web administration login
    #[serde(default)]
    pub admin_username: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    /// MAC address used by `change-mac` when none is given
    #[serde(default)]
    pub mac_address: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Request timeout in seconds. Unset means requests may block indefinitely.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconnectConfig {
    /// Seconds between disconnect and connect
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_interval() -> u64 {
    DEFAULT_WAIT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `path`, or from the first default location
    /// that exists, or use defaults if none is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let config_paths = vec![
            PathBuf::from("tplink.toml"),
            PathBuf::from("/etc/tplink/config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".config/tplink/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    /// Build the one router client this configuration describes.
    pub fn build_router(&self) -> Result<Router> {
        let transport = HttpClient::new(self.http.timeout.map(Duration::from_secs))?;
        let mut router = Router::with_transport(
            Box::new(transport),
            self.router.host.as_deref().filter(|h| !h.is_empty()),
            self.router.admin_username.as_deref(),
            self.router.admin_password.as_deref(),
        );

        if let Some(mac) = self.router.mac_address.as_deref().filter(|m| !m.is_empty()) {
            router.set_mac_address(mac);
        }

        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let cfg = Config::parse(
            r#"
            [router]
            host = "192.168.0.1"
            admin_username = "admin"
            admin_password = "admin"
            mac_address = "AA-BB-CC-DD-EE-FF"

            [http]
            timeout = 15

            [reconnect]
            interval = 30

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.router.host.as_deref(), Some("192.168.0.1"));
        assert_eq!(cfg.router.admin_password.as_deref(), Some("admin"));
        assert_eq!(cfg.http.timeout, Some(15));
        assert_eq!(cfg.reconnect.interval, 30);
        assert_eq!(cfg.logging.level, "debug");

        let router = cfg.build_router().unwrap();
        assert_eq!(router.host(), Some("192.168.0.1"));
        assert_eq!(router.mac_address(), Some("AA-BB-CC-DD-EE-FF"));
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::parse("").unwrap();

        assert!(cfg.router.host.is_none());
        assert!(cfg.http.timeout.is_none());
        assert_eq!(cfg.reconnect.interval, 10);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_mac_is_ignored() {
        let cfg = Config::parse("[router]\nmac_address = \"\"\n").unwrap();
        assert_eq!(cfg.build_router().unwrap().mac_address(), None);
    }

    #[test]
    fn test_empty_host_is_undefined() {
        let cfg = Config::parse("[router]\nhost = \"\"\n").unwrap();
        assert_eq!(cfg.build_router().unwrap().host(), None);
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/tplink.toml"))).is_err());
    }
}
