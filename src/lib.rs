//! Basic tools MCP server library.
//!
//! Exposes a small set of tools (a safe calculator, text processing, current
//! time and URL fetching) through a tool registry, and serves that registry
//! over the Model Context Protocol so a chat orchestrator can list and call
//! them.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **expression**: the restricted arithmetic evaluator behind `calculator`
//!   - **tools**: tool descriptors, the registry and the built-in tools
//!   - **resources**: generated documentation clients can read
//!
//! # Example
//!
//! ```rust,no_run
//! use basic_tools_mcp::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```
//!
//! The registry can also be used without a transport:
//!
//! ```rust
//! use basic_tools_mcp::core::config::ToolsConfig;
//! use basic_tools_mcp::domains::tools::{InvocationRequest, ToolRegistry};
//! use serde_json::json;
//!
//! let registry = ToolRegistry::with_builtins(&ToolsConfig::default()).unwrap();
//! let result = registry.invoke(&InvocationRequest::new(
//!     "calculator",
//!     json!({ "expression": "2 + 3 * 4" }),
//! ));
//! assert_eq!(result.value().unwrap()["result"], json!(14.0));
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
