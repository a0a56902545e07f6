//! Runs the configured transport.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "http")]
use super::http::HttpTransport;
#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

/// Owns the transport choice and serves an [`McpServer`] over it.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Serve `server` until the transport shuts down.
    ///
    /// Stdio returns when the client closes stdin; HTTP runs until the
    /// process is stopped or the listener fails.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!(
            server = server.name(),
            tools = server.registry().len(),
            "Starting transport: {}",
            self.config.description()
        );

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
        }
    }
}
