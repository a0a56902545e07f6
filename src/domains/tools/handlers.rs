//! Tool handlers module.
//!
//! Defines the handler interface every tool implements and the request and
//! result envelopes exchanged with the registry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ErrorKind, ToolError};
use super::schema::Arguments;

/// A tool invocation as requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// The name of the tool to execute.
    pub name: String,

    /// The arguments to pass to the tool (a JSON object, or null).
    #[serde(default)]
    pub arguments: Value,
}

impl InvocationRequest {
    /// Create a new invocation request.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The uniform result envelope returned by every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success { value: Value },
    Failure { kind: ErrorKind, message: String },
}

impl InvocationResult {
    /// Create a successful result.
    pub fn success(value: Value) -> Self {
        Self::Success { value }
    }

    /// Create a failed result from a tool error.
    pub fn failure(error: &ToolError) -> Self {
        Self::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The error kind, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure { .. } => None,
        }
    }
}

impl From<Result<Value, ToolError>> for InvocationResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(&error),
        }
    }
}

/// Trait implemented by every tool.
///
/// Handlers receive arguments that already passed schema validation. They
/// are synchronous; the async transports run them on the blocking pool.
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments.
    fn call(&self, args: &Arguments) -> Result<Value, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(&Arguments) -> Result<Value, ToolError> + Send + Sync,
{
    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        self(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserializes_from_tool_call() {
        let request: InvocationRequest =
            serde_json::from_value(json!({ "name": "calculator", "arguments": { "expression": "1+1" } }))
                .unwrap();
        assert_eq!(request.name, "calculator");
        assert_eq!(request.arguments["expression"], "1+1");

        let request: InvocationRequest =
            serde_json::from_value(json!({ "name": "time_tool" })).unwrap();
        assert!(request.arguments.is_null());
    }

    #[test]
    fn test_result_serialization() {
        let ok = InvocationResult::success(json!("HELLO"));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "status": "success", "value": "HELLO" })
        );

        let failed = InvocationResult::failure(&ToolError::unknown_tool("nope"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "status": "failure", "kind": "UnknownToolError", "message": "Tool not found: nope" })
        );
    }

    #[test]
    fn test_closure_handler() {
        let handler = |args: &Arguments| -> Result<Value, ToolError> {
            Ok(json!(args.str("name")?.len()))
        };
        let args = Arguments::new(json!({ "name": "abc" }).as_object().cloned().unwrap());
        assert_eq!(ToolHandler::call(&handler, &args).unwrap(), json!(3));
    }
}
