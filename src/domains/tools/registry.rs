//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry has two phases. A [`ToolRegistryBuilder`] accepts
//! registrations at startup; [`ToolRegistryBuilder::build`] freezes it into
//! an immutable [`ToolRegistry`] that can be shared across threads and only
//! serves lookups and invocations. Registering after that point is not
//! expressible.
//!
//! The registry is also the fault-isolation boundary: argument errors,
//! handler errors and handler panics all come back as
//! [`InvocationResult::Failure`] and never affect later calls.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::core::config::ToolsConfig;

use super::definitions::{CalculatorTool, TextTool, TimeTool, UrlTool};
use super::error::ToolError;
use super::handlers::{InvocationRequest, InvocationResult, ToolHandler};
use super::schema::ToolDescriptor;

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Box<dyn ToolHandler>,
}

// ============================================================================
// Registration phase
// ============================================================================

/// Collects tool registrations before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Names are unique: registering a name twice fails with
    /// `DuplicateToolError` and the first registration stays in effect.
    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H) -> Result<(), ToolError>
    where
        H: ToolHandler + 'static,
    {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            warn!("Rejected duplicate tool registration: {}", name);
            return Err(ToolError::duplicate(name));
        }

        info!("Registering tool: {}", name);
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Register the built-in tools.
    pub fn register_builtins(&mut self, config: &ToolsConfig) -> Result<(), ToolError> {
        self.register(CalculatorTool::descriptor(), CalculatorTool)?;
        self.register(TextTool::descriptor(), TextTool)?;
        self.register(
            TimeTool::descriptor(config),
            TimeTool::from_config(config)?,
        )?;
        self.register(UrlTool::descriptor(config), UrlTool::from_config(config))?;
        Ok(())
    }

    /// Freeze the registrations.
    pub fn build(self) -> ToolRegistry {
        info!("Tool registry ready with {} tool(s)", self.tools.len());
        ToolRegistry {
            tools: self.tools,
            index: self.index,
        }
    }
}

// ============================================================================
// Steady state
// ============================================================================

/// Immutable registry of tools. Safe to share between threads.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Start a registration phase.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Build a registry containing only the built-in tools.
    pub fn with_builtins(config: &ToolsConfig) -> Result<Self, ToolError> {
        let mut builder = Self::builder();
        builder.register_builtins(config)?;
        Ok(builder.build())
    }

    /// List tool descriptors in registration order.
    ///
    /// The iterator is lazy and can be cloned to restart it.
    pub fn list(&self) -> impl Iterator<Item = &ToolDescriptor> + Clone + '_ {
        self.tools.iter().map(|tool| &tool.descriptor)
    }

    /// Get all tool names in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.list().map(ToolDescriptor::name).collect()
    }

    /// Look up a tool descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.lookup(name).map(|tool| &tool.descriptor)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool.
    ///
    /// Never panics and never returns a bare error: every outcome is wrapped
    /// in an [`InvocationResult`].
    #[instrument(skip_all, fields(tool = %request.name))]
    pub fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        match self.dispatch(request) {
            Ok(value) => {
                info!("Tool call succeeded");
                InvocationResult::success(value)
            }
            Err(e) => {
                warn!(kind = %e.kind(), "Tool call failed: {}", e);
                InvocationResult::failure(&e)
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    fn dispatch(&self, request: &InvocationRequest) -> Result<Value, ToolError> {
        let tool = self
            .lookup(&request.name)
            .ok_or_else(|| ToolError::unknown_tool(request.name.as_str()))?;

        let args = tool.descriptor.validate(&request.arguments)?;
        debug!("Arguments validated: {:?}", args);

        match panic::catch_unwind(AssertUnwindSafe(|| tool.handler.call(&args))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Tool handler panicked: {}", message);
                Err(ToolError::handler(format!("handler panicked: {}", message)))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::schema::{Arguments, ParamSpec, ParamType};
    use crate::domains::tools::ErrorKind;
    use serde_json::json;
    use std::sync::Arc;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::with_builtins(&ToolsConfig::default()).unwrap()
    }

    fn divide_descriptor() -> ToolDescriptor {
        ToolDescriptor::new("divide", "Integer division")
            .param(ParamSpec::required("divisor", ParamType::Integer, "Divisor"))
    }

    fn divide(args: &Arguments) -> Result<Value, ToolError> {
        let divisor = args.i64("divisor")?;
        Ok(json!(100 / divisor))
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        assert_eq!(
            registry.tool_names(),
            vec!["calculator", "text_tool", "time_tool", "url_tool"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_list_is_restartable() {
        let registry = test_registry();
        let listing = registry.list();
        let first: Vec<_> = listing.clone().map(ToolDescriptor::name).collect();
        let second: Vec<_> = listing.map(ToolDescriptor::name).collect();
        assert_eq!(first, second);
        assert_eq!(registry.list().count(), registry.len());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut builder = ToolRegistry::builder();
        builder
            .register(ToolDescriptor::new("echo", "first"), |_: &Arguments| -> Result<Value, ToolError> {
                Ok(json!("first"))
            })
            .unwrap();
        let err = builder
            .register(ToolDescriptor::new("echo", "second"), |_: &Arguments| -> Result<Value, ToolError> {
                Ok(json!("second"))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateToolError);

        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description(), "first");
        let result = registry.invoke(&InvocationRequest::new("echo", json!({})));
        assert_eq!(result, InvocationResult::success(json!("first")));
    }

    #[test]
    fn test_invoke_unknown_tool() {
        let registry = test_registry();
        let result = registry.invoke(&InvocationRequest::new("unknown", json!({})));
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownToolError));
    }

    #[test]
    fn test_invoke_calculator() {
        let registry = test_registry();
        let result = registry.invoke(&InvocationRequest::new(
            "calculator",
            json!({ "expression": "2 + 3 * 4" }),
        ));
        assert_eq!(result.value().unwrap()["result"], json!(14.0));

        let result = registry.invoke(&InvocationRequest::new(
            "calculator",
            json!({ "expression": "1/0" }),
        ));
        assert_eq!(result.error_kind(), Some(ErrorKind::DivisionByZero));
    }

    #[test]
    fn test_invoke_text_tool() {
        let registry = test_registry();
        let result = registry.invoke(&InvocationRequest::new(
            "text_tool",
            json!({ "text": "Hello", "op": "upper" }),
        ));
        assert_eq!(result, InvocationResult::success(json!("HELLO")));

        let result = registry.invoke(&InvocationRequest::new(
            "text_tool",
            json!({ "text": "Hello", "op": "frobnicate" }),
        ));
        assert_eq!(result.error_kind(), Some(ErrorKind::UnsupportedOperation));
    }

    #[test]
    fn test_invoke_validates_arguments() {
        let registry = test_registry();

        let result = registry.invoke(&InvocationRequest::new("calculator", json!({})));
        assert_eq!(result.error_kind(), Some(ErrorKind::MissingArgumentError));

        let result = registry.invoke(&InvocationRequest::new(
            "calculator",
            json!({ "expression": "1", "precision": 2 }),
        ));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgumentError));

        let result = registry.invoke(&InvocationRequest::new(
            "url_tool",
            json!({ "url": "https://example.com", "max_length": "lots" }),
        ));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgumentError));
    }

    #[test]
    fn test_handler_panic_is_isolated() {
        let mut builder = ToolRegistry::builder();
        builder.register(divide_descriptor(), divide).unwrap();
        let registry = builder.build();

        let result = registry.invoke(&InvocationRequest::new("divide", json!({ "divisor": 0 })));
        assert_eq!(result.error_kind(), Some(ErrorKind::HandlerError));
        match &result {
            InvocationResult::Failure { message, .. } => {
                assert!(message.contains("divide by zero"), "{}", message)
            }
            other => panic!("expected failure, got {:?}", other),
        }

        // The registry keeps serving after a panic.
        let result = registry.invoke(&InvocationRequest::new("divide", json!({ "divisor": 4 })));
        assert_eq!(result, InvocationResult::success(json!(25)));
    }

    #[test]
    fn test_handler_errors_keep_their_kind() {
        let mut builder = ToolRegistry::builder();
        builder
            .register(ToolDescriptor::new("flaky", "Always fails"), |_: &Arguments| -> Result<Value, ToolError> {
                Err(ToolError::fetch("connection reset"))
            })
            .unwrap();
        let registry = builder.build();

        let result = registry.invoke(&InvocationRequest::new("flaky", Value::Null));
        assert_eq!(result.error_kind(), Some(ErrorKind::FetchError));
    }

    #[test]
    fn test_concurrent_invocations() {
        let registry = Arc::new(test_registry());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.invoke(&InvocationRequest::new(
                        "calculator",
                        json!({ "expression": format!("{} * 2", i) }),
                    ))
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            assert_eq!(result.value().unwrap()["result"], json!((i * 2) as f64));
        }
    }
}
