//! Ways of carrying MCP traffic to the server.
//!
//! - `stdio` (default feature): rmcp framing on stdin/stdout, for clients
//!   that launch the server as a child process.
//! - `http`: a JSON-RPC endpoint served by axum, for clients that cannot
//!   spawn processes.
//!
//! [`TransportService`] runs whichever one [`TransportConfig`] selects.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

#[cfg(feature = "http")]
pub use config::HttpConfig;
pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(not(any(feature = "stdio", feature = "http")))]
compile_error!("enable at least one transport feature: `stdio` or `http`");
