//! Resource service implementation.
//!
//! The ResourceService renders every registered resource once at startup
//! and serves list and read requests from that snapshot.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::definitions::ResourceContext;
use super::error::ResourceError;
use super::registry::get_all_resources;

/// Service for managing and accessing resources.
pub struct ResourceService {
    /// Key: resource URI.
    resources: BTreeMap<String, ResourceEntry>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Rendered text content.
    pub content: String,
}

impl ResourceService {
    /// Create a ResourceService by rendering every registered resource.
    pub fn new(ctx: &ResourceContext<'_>) -> Result<Self, ResourceError> {
        info!("Initializing ResourceService");

        let mut service = Self {
            resources: BTreeMap::new(),
        };
        for entry in get_all_resources(ctx)? {
            service.register_resource(entry);
        }

        Ok(service)
    }

    /// Register a resource, replacing any entry with the same URI.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources.insert(entry.resource.raw.uri.clone(), entry);
    }

    /// List all available resources, ordered by URI.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self.resources.get(uri).ok_or_else(|| {
            warn!("Unknown resource requested: {}", uri);
            ResourceError::not_found(uri)
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(entry.content.clone(), uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ServerConfig, ToolsConfig};
    use crate::domains::tools::ToolRegistry;

    fn service() -> ResourceService {
        let registry = ToolRegistry::with_builtins(&ToolsConfig::default()).unwrap();
        let server = ServerConfig::default();
        ResourceService::new(&ResourceContext {
            server: &server,
            registry: &registry,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_resource_service_creation() {
        let resources = service().list_resources().await;
        assert_eq!(resources.len(), 2);
    }

    #[tokio::test]
    async fn test_read_tools_help() {
        let result = service().read_resource("mcp://tools/help").await.unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert!(text.contains("## calculator"));
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let result = service().read_resource("mcp://server/nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
