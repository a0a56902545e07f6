//! Tool-specific error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::expression::EvalError;

/// Stable classification of every failure a tool invocation can produce.
///
/// The serialized names are part of the result envelope and are shown to
/// the model verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    SyntaxError,
    UnknownFunction,
    DivisionByZero,
    NumericError,
    UnknownToolError,
    DuplicateToolError,
    MissingArgumentError,
    InvalidArgumentError,
    HandlerError,
    FetchError,
    UnsupportedContentType,
    UnsupportedOperation,
}

impl ErrorKind {
    /// The stable name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SyntaxError => "SyntaxError",
            Self::UnknownFunction => "UnknownFunction",
            Self::DivisionByZero => "DivisionByZero",
            Self::NumericError => "NumericError",
            Self::UnknownToolError => "UnknownToolError",
            Self::DuplicateToolError => "DuplicateToolError",
            Self::MissingArgumentError => "MissingArgumentError",
            Self::InvalidArgumentError => "InvalidArgumentError",
            Self::HandlerError => "HandlerError",
            Self::FetchError => "FetchError",
            Self::UnsupportedContentType => "UnsupportedContentType",
            Self::UnsupportedOperation => "UnsupportedOperation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during tool registration and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The calculator's expression could not be evaluated.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// A required argument was not supplied.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An argument was unrecognized or had the wrong type.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// The handler failed or panicked.
    #[error("Handler failed: {0}")]
    Handler(String),

    /// A network fetch failed or timed out.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The fetched resource is not textual.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The requested operation is not supported by the tool.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "duplicate tool" error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::Duplicate(name.into())
    }

    /// Create a new "missing argument" error.
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument(name.into())
    }

    /// Create a new "invalid argument" error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "handler" error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    /// Create a new "fetch" error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new "unsupported content type" error.
    pub fn unsupported_content_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedContentType(content_type.into())
    }

    /// Create a new "unsupported operation" error.
    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Eval(EvalError::Syntax { .. }) => ErrorKind::SyntaxError,
            Self::Eval(EvalError::UnknownFunction(_)) => ErrorKind::UnknownFunction,
            Self::Eval(EvalError::DivisionByZero) => ErrorKind::DivisionByZero,
            Self::Eval(EvalError::Numeric(_)) => ErrorKind::NumericError,
            Self::UnknownTool(_) => ErrorKind::UnknownToolError,
            Self::Duplicate(_) => ErrorKind::DuplicateToolError,
            Self::MissingArgument(_) => ErrorKind::MissingArgumentError,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgumentError,
            Self::Handler(_) => ErrorKind::HandlerError,
            Self::Fetch(_) => ErrorKind::FetchError,
            Self::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_errors_keep_their_kind() {
        assert_eq!(
            ToolError::from(EvalError::DivisionByZero).kind(),
            ErrorKind::DivisionByZero
        );
        assert_eq!(
            ToolError::from(EvalError::syntax(0, "empty expression")).kind(),
            ErrorKind::SyntaxError
        );
    }

    #[test]
    fn test_kind_serializes_as_stable_name() {
        let json = serde_json::to_value(ErrorKind::UnsupportedOperation).unwrap();
        assert_eq!(json, serde_json::json!("UnsupportedOperation"));
        assert_eq!(ErrorKind::FetchError.to_string(), "FetchError");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::invalid_argument("op", "expected string").to_string(),
            "Invalid argument 'op': expected string"
        );
        assert_eq!(
            ToolError::from(EvalError::unknown_function("foo")).to_string(),
            "Unknown function: foo"
        );
    }
}
