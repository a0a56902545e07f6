//! Resource definitions module.
//!
//! Each resource is defined in its own file with its URI, metadata and a
//! renderer. Resources are rendered once when the service is built; the
//! tool registry they describe is immutable after startup.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod server_info;
mod tools_help;

pub use server_info::ServerInfoResource;
pub use tools_help::ToolsHelpResource;

use crate::core::config::ServerConfig;
use crate::domains::tools::ToolRegistry;

use super::error::ResourceError;

/// Everything a resource may render from.
#[derive(Clone, Copy)]
pub struct ResourceContext<'a> {
    pub server: &'a ServerConfig,
    pub registry: &'a ToolRegistry,
}

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata and content.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Render the resource body.
    fn render(ctx: &ResourceContext<'_>) -> Result<String, ResourceError>;
}
