//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It initializes logging,
//! loads configuration, and starts the server with the configured transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use basic_tools_mcp::core::config::LoggingConfig;
use basic_tools_mcp::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before the full config so malformed values get reported.
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env());

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone())?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout is reserved for STDIO protocol traffic.
fn init_logging(config: &LoggingConfig) {
    let level = match config.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
