//! Configuration management for the MCP server.
//!
//! Values come from defaults, overridden by `MCP_*` environment variables
//! (a `.env` file in the working directory is loaded first).

use std::fmt::Display;
use std::str::FromStr;

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Built-in tool settings.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Settings for the built-in tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Timeout applied to every `url_tool` request, in seconds.
    pub fetch_timeout_secs: u64,

    /// Default `max_length` for `url_tool`.
    pub fetch_max_length: usize,

    /// User agent sent by `url_tool`.
    pub fetch_user_agent: String,

    /// Offset used by `time_tool` when the caller gives none.
    pub default_utc_offset: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "basic-tools-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            fetch_max_length: 2000,
            fetch_user_agent: concat!("basic-tools-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
            default_utc_offset: "+09:00".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ToolsConfig {
    /// Load tool settings from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fetch_timeout_secs: env_parse_at_least("MCP_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs, 1),
            fetch_max_length: env_parse_at_least("MCP_FETCH_MAX_LENGTH", defaults.fetch_max_length, 1),
            fetch_user_agent: std::env::var("MCP_FETCH_USER_AGENT").unwrap_or(defaults.fetch_user_agent),
            default_utc_offset: std::env::var("MCP_TIME_UTC_OFFSET").unwrap_or(defaults.default_utc_offset),
        }
    }
}

impl LoggingConfig {
    /// Load the log level from `MCP_LOG_LEVEL`.
    ///
    /// Unknown level names are kept as given; `main` maps them to `info`.
    pub fn from_env() -> Self {
        match std::env::var("MCP_LOG_LEVEL") {
            Ok(level) if !level.trim().is_empty() => Self {
                level: level.trim().to_lowercase(),
            },
            _ => Self::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.tools = ToolsConfig::from_env();
        config.transport = TransportConfig::from_env();

        config
    }
}

/// Read and parse `key`, falling back to `default` when it is unset or
/// malformed.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring malformed {}={:?}, using {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Like [`env_parse`], but values below `min` also fall back to `default`.
pub(crate) fn env_parse_at_least<T>(key: &str, default: T, min: T) -> T
where
    T: FromStr + Display + PartialOrd + Copy,
{
    let value = env_parse(key, default);
    if value < min {
        warn!("Ignoring {}={}, must be at least {}; using {}", key, value, min, default);
        default
    } else {
        value
    }
}

// Mutex to ensure env var tests run serially, shared with the transport tests.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
