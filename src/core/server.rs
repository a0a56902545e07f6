//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! Tools live in a frozen [`ToolRegistry`] built at startup. The rmcp
//! ToolRouter is derived from it in `domains/tools/router.rs`, and the HTTP
//! transport calls the same registry through [`McpServer::call_tool`], so
//! both paths see identical tools and results.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::{
    resources::{ResourceContext, ResourceService},
    tools::{
        InvocationRequest, ToolRegistry, build_tool_router,
        router::{invoke_blocking, to_call_tool_result},
    },
};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// The immutable tool registry.
    registry: Arc<ToolRegistry>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the built-in tools.
    pub fn new(config: Config) -> super::Result<Self> {
        let registry = ToolRegistry::with_builtins(&config.tools)?;
        Self::with_registry(config, registry)
    }

    /// Create a new MCP server serving an already built registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> super::Result<Self> {
        let config = Arc::new(config);
        let registry = Arc::new(registry);

        let resource_service = Arc::new(ResourceService::new(&ResourceContext {
            server: &config.server,
            registry: &registry,
        })?);

        info!("Server ready with {} tool(s)", registry.len());

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config,
            registry,
            resource_service,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "outputSchema": t.output_schema,
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Tool failures are reported inside the returned `CallToolResult`
    /// (`isError: true`); only a failed blocking task is an `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        let request = InvocationRequest::new(name, arguments);
        invoke_blocking(self.registry.clone(), request)
            .await
            .map(to_call_tool_result)
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        let resources = self.resource_service.list_resources().await;

        resources
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        match self.resource_service.read_resource(uri).await {
            Ok(result) => Ok(serde_json::json!({
                "contents": result.contents
            })),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Basic tools server: calculator (safe arithmetic), text_tool, time_tool and url_tool. \
                 Read mcp://tools/help for parameter details."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    #[test]
    fn test_list_tools() {
        let tools = server().list_tools();
        let names: Vec<_> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"calculator"));
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_tool_success_and_failure() {
        let server = server();

        let ok = server
            .call_tool("calculator", json!({ "expression": "6 * 7" }))
            .await
            .unwrap();
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(ok.structured_content.unwrap()["result"], json!(42.0));

        let failed = server.call_tool("no_such_tool", json!({})).await.unwrap();
        assert_eq!(failed.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server();
        let resources = server.list_resources().await;
        assert_eq!(resources.len(), 2);

        assert!(server.read_resource("mcp://tools/help").await.is_ok());
        assert!(server.read_resource("mcp://nope").await.is_err());
    }

    #[test]
    fn test_info_reports_configured_name() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "basic-tools-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_none());
    }
}
