//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use rmcp::model::{AnnotateAble, RawResource};

use super::definitions::{ResourceContext, ResourceDefinition, ServerInfoResource, ToolsHelpResource};
use super::error::ResourceError;
use super::service::ResourceEntry;

/// Render a definition into a registry entry.
fn build_resource<R: ResourceDefinition>(ctx: &ResourceContext<'_>) -> Result<ResourceEntry, ResourceError> {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    Ok(ResourceEntry {
        resource: raw.no_annotation(),
        content: R::render(ctx)?,
    })
}

/// Get all registered resources as ResourceEntries.
pub fn get_all_resources(ctx: &ResourceContext<'_>) -> Result<Vec<ResourceEntry>, ResourceError> {
    Ok(vec![
        build_resource::<ToolsHelpResource>(ctx)?,
        build_resource::<ServerInfoResource>(ctx)?,
    ])
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![ToolsHelpResource::URI, ServerInfoResource::URI]
}
