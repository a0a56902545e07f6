//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
///
/// This enum captures all possible error conditions that can occur during
/// server operation, including domain-specific errors and external failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error evaluating an arithmetic expression.
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::domains::expression::EvalError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport setup or runtime failure.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ErrorKind, ToolError};

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::unknown_tool("nope").into();
        assert!(matches!(&err, Error::Tool(e) if e.kind() == ErrorKind::UnknownToolError));
        assert_eq!(err.to_string(), "Tool error: Tool not found: nope");
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(Error::config("bad"), Error::Config(m) if m == "bad"));
        assert!(matches!(Error::internal("oops"), Error::Internal(m) if m == "oops"));
    }
}
