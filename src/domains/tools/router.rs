//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! One dynamic route is created per registered descriptor. Calls are
//! forwarded to [`ToolRegistry::invoke`] on the blocking thread pool, so the
//! synchronous handlers (including the blocking HTTP fetcher) never stall
//! the async runtime.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, Tool},
};
use serde_json::Value;
use tracing::error;

use super::handlers::{InvocationRequest, InvocationResult};
use super::registry::ToolRegistry;
use super::schema::ToolDescriptor;

/// Build the tool router with every tool in `registry`.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .list()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(registry.clone(), descriptor))
        })
}

fn create_route<S>(registry: Arc<ToolRegistry>, descriptor: &ToolDescriptor) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name().to_string();
    ToolRoute::new_dyn(to_tool(descriptor), move |ctx: ToolCallContext<'_, S>| {
        let arguments = ctx.arguments.clone().map(Value::Object).unwrap_or(Value::Null);
        let request = InvocationRequest::new(name.clone(), arguments);
        let registry = registry.clone();
        async move { invoke_blocking(registry, request).await.map(to_call_tool_result) }.boxed()
    })
}

/// Run `request` against `registry` on the blocking pool.
pub async fn invoke_blocking(
    registry: Arc<ToolRegistry>,
    request: InvocationRequest,
) -> Result<InvocationResult, McpError> {
    tokio::task::spawn_blocking(move || registry.invoke(&request))
        .await
        .map_err(|e| {
            error!("Tool task failed to complete: {}", e);
            McpError::internal_error(format!("tool task failed: {e}"), None)
        })
}

/// Create the MCP Tool model for a descriptor.
pub fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool {
        name: descriptor.name().to_string().into(),
        description: Some(descriptor.description().to_string().into()),
        input_schema: Arc::new(descriptor.input_schema()),
        annotations: None,
        output_schema: descriptor.output_schema().cloned(),
        icons: None,
        meta: None,
        title: None,
    }
}

/// Map an invocation result onto the MCP call result.
///
/// Objects are returned as structured content, strings as plain text and
/// any other value as its JSON text. Failures set `is_error` and carry
/// `"<Kind>: <message>"`.
pub fn to_call_tool_result(result: InvocationResult) -> CallToolResult {
    match result {
        InvocationResult::Success { value: value @ Value::Object(_) } => CallToolResult::structured(value),
        InvocationResult::Success { value: Value::String(text) } => {
            CallToolResult::success(vec![Content::text(text)])
        }
        InvocationResult::Success { value } => CallToolResult::success(vec![Content::text(value.to_string())]),
        InvocationResult::Failure { kind, message } => {
            CallToolResult::error(vec![Content::text(format!("{}: {}", kind, message))])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ToolsConfig;
    use crate::domains::tools::ErrorKind;
    use serde_json::json;

    struct TestServer {}

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::with_builtins(&ToolsConfig::default()).unwrap())
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(registry());
        let tools = router.list_all();
        assert_eq!(tools.len(), 4);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        for name in ["calculator", "text_tool", "time_tool", "url_tool"] {
            assert!(names.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = registry();
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let router_tools = router.list_all();

        assert_eq!(registry.len(), router_tools.len());
        for descriptor in registry.list() {
            let tool = router_tools
                .iter()
                .find(|t| t.name.as_ref() == descriptor.name())
                .unwrap();
            assert_eq!(*tool.input_schema, descriptor.input_schema());
        }
    }

    #[test]
    fn test_to_call_tool_result_shapes() {
        let result = to_call_tool_result(InvocationResult::success(json!({ "result": 4.0 })));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content, Some(json!({ "result": 4.0 })));

        let result = to_call_tool_result(InvocationResult::success(json!("HELLO")));
        assert_eq!(text_of(&result), "HELLO");

        let result = to_call_tool_result(InvocationResult::success(json!(3)));
        assert_eq!(text_of(&result), "3");
    }

    #[test]
    fn test_failure_is_error_result() {
        let result = to_call_tool_result(InvocationResult::Failure {
            kind: ErrorKind::DivisionByZero,
            message: "Division by zero".to_string(),
        });
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "DivisionByZero: Division by zero");
    }

    #[tokio::test]
    async fn test_invoke_blocking() {
        let request = InvocationRequest::new("calculator", json!({ "expression": "2 ^ 10" }));
        let result = invoke_blocking(registry(), request).await.unwrap();
        assert_eq!(result.value().unwrap()["result"], json!(1024.0));
    }
}
