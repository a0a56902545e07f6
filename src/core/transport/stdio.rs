//! MCP over the process's stdin and stdout.
//!
//! Stdout carries protocol frames only, so `main` routes all logging to
//! stderr. The session lasts until the client closes stdin.

use rmcp::ServiceExt;
use rmcp::service::QuitReason;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// Serves one MCP session on stdin/stdout.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the session to completion.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let tools = server.registry().len();

        let session = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;
        info!(tools, "Serving over stdio");

        let reason = session
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;
        session_outcome(reason)
    }
}

/// A closed or cancelled session is a normal shutdown; a crashed session
/// task is not.
fn session_outcome(reason: QuitReason) -> TransportResult<()> {
    match reason {
        QuitReason::Closed => {
            info!("Client closed stdin, session finished");
            Ok(())
        }
        QuitReason::Cancelled => {
            info!("Stdio session cancelled");
            Ok(())
        }
        QuitReason::JoinError(e) => Err(TransportError::service(format!(
            "stdio session task failed: {}",
            e
        ))),
    }
}
