//! Transport selection.
//!
//! `MCP_TRANSPORT` picks the transport (`stdio` or `http`); the HTTP
//! listener reads `MCP_HTTP_HOST`, `MCP_HTTP_PORT`, `MCP_HTTP_PATH` and
//! `MCP_HTTP_CORS`. Unknown or malformed values are logged and replaced by
//! defaults so a typo never keeps the server from starting.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "http")]
use crate::core::config::env_parse;

/// The transport the server is served over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    #[cfg(feature = "stdio")]
    Stdio,

    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// Where and how the HTTP JSON-RPC endpoint listens.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,

    /// Path of the JSON-RPC endpoint. Always starts with `/`.
    pub rpc_path: String,

    /// Answer browser preflight requests from any origin.
    pub enable_cors: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        return Self::Stdio;

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        return Self::Http(HttpConfig::default());
    }
}

impl TransportConfig {
    /// Resolve a transport by name, reading its settings from the
    /// environment. Returns `None` for names this build cannot serve.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Some(Self::Stdio),
            #[cfg(feature = "http")]
            "http" => Some(Self::Http(HttpConfig::from_env())),
            _ => None,
        }
    }

    /// Load the transport from `MCP_TRANSPORT`, defaulting to stdio.
    pub fn from_env() -> Self {
        match std::env::var("MCP_TRANSPORT") {
            Ok(raw) if !raw.trim().is_empty() => Self::from_name(&raw).unwrap_or_else(|| {
                let fallback = Self::default();
                warn!(
                    "Unsupported MCP_TRANSPORT={:?} in this build, using {}",
                    raw,
                    fallback.name()
                );
                fallback
            }),
            _ => Self::default(),
        }
    }

    /// Short transport name, as accepted by [`TransportConfig::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "stdio",
            #[cfg(feature = "http")]
            Self::Http(_) => "http",
        }
    }

    /// Human-readable summary for the startup log.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "stdio (MCP framing on stdin/stdout)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("http (JSON-RPC at {}{})", cfg.address(), cfg.rpc_path),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rpc_path: "/mcp".to_string(),
            enable_cors: true,
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Load listener settings from the `MCP_HTTP_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("MCP_HTTP_HOST")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.host),
            port: env_parse("MCP_HTTP_PORT", defaults.port),
            rpc_path: std::env::var("MCP_HTTP_PATH")
                .ok()
                .and_then(|p| normalize_rpc_path(&p))
                .unwrap_or(defaults.rpc_path),
            enable_cors: env_flag("MCP_HTTP_CORS", defaults.enable_cors),
        }
    }

    /// `host:port` to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Give `path` a single leading slash and no trailing one. The root path is
/// taken by the index page, so it is rejected.
#[cfg(feature = "http")]
fn normalize_rpc_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        warn!("Ignoring MCP_HTTP_PATH={:?}, the endpoint needs its own path", path);
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

#[cfg(feature = "http")]
fn env_flag(key: &str, default: bool) -> bool {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!("Ignoring malformed {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ENV_TEST_LOCK;

    const TRANSPORT_VARS: [&str; 5] = [
        "MCP_TRANSPORT",
        "MCP_HTTP_HOST",
        "MCP_HTTP_PORT",
        "MCP_HTTP_PATH",
        "MCP_HTTP_CORS",
    ];

    fn clear_transport_vars() {
        for key in TRANSPORT_VARS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_is_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_transport_vars();

        assert_eq!(TransportConfig::default(), TransportConfig::Stdio);
        assert_eq!(TransportConfig::from_env(), TransportConfig::Stdio);
        assert_eq!(TransportConfig::from_name(" STDIO "), Some(TransportConfig::Stdio));
        assert_eq!(TransportConfig::Stdio.name(), "stdio");
    }

    #[test]
    fn test_unknown_transport_falls_back_to_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_transport_vars();

        assert_eq!(TransportConfig::from_name("tcp"), None);
        assert_eq!(TransportConfig::from_name("carrier-pigeon"), None);

        unsafe {
            std::env::set_var("MCP_TRANSPORT", "tcp");
        }
        assert_eq!(TransportConfig::from_env(), TransportConfig::default());
        clear_transport_vars();
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_transport_vars();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "http");
            std::env::set_var("MCP_HTTP_HOST", "0.0.0.0");
            std::env::set_var("MCP_HTTP_PORT", "9000");
            std::env::set_var("MCP_HTTP_PATH", "rpc/");
            std::env::set_var("MCP_HTTP_CORS", "off");
        }

        let config = TransportConfig::from_env();
        assert_eq!(
            config,
            TransportConfig::Http(HttpConfig {
                host: "0.0.0.0".to_string(),
                port: 9000,
                rpc_path: "/rpc".to_string(),
                enable_cors: false,
            })
        );
        assert_eq!(config.description(), "http (JSON-RPC at 0.0.0.0:9000/rpc)");
        clear_transport_vars();
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_malformed_values_fall_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_transport_vars();
        unsafe {
            std::env::set_var("MCP_HTTP_PORT", "99999");
            std::env::set_var("MCP_HTTP_PATH", "/");
            std::env::set_var("MCP_HTTP_CORS", "sometimes");
        }

        assert_eq!(HttpConfig::from_env(), HttpConfig::default());
        clear_transport_vars();
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_config_serializes_with_tag() {
        let config = TransportConfig::Http(HttpConfig::default());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "http");
        assert_eq!(json["rpc_path"], "/mcp");

        let parsed: TransportConfig =
            serde_json::from_value(serde_json::json!({ "type": "http", "port": 7000 })).unwrap();
        assert_eq!(
            parsed,
            TransportConfig::Http(HttpConfig {
                port: 7000,
                ..HttpConfig::default()
            })
        );
    }
}
