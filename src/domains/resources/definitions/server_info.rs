//! Server info resource definition.

use super::{ResourceContext, ResourceDefinition};
use crate::domains::resources::error::ResourceError;

/// Server information resource.
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "mcp://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Name, version and tool list of this MCP server";
    const MIME_TYPE: &'static str = "application/json";

    fn render(ctx: &ResourceContext<'_>) -> Result<String, ResourceError> {
        let info = serde_json::json!({
            "server": ctx.server.name,
            "version": ctx.server.version,
            "tools": ctx.registry.tool_names(),
        });

        serde_json::to_string_pretty(&info).map_err(|e| ResourceError::internal(e.to_string()))
    }
}
