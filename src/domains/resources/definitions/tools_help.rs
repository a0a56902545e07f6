//! Tools help resource definition.

use std::fmt::Write;

use super::{ResourceContext, ResourceDefinition};
use crate::domains::resources::error::ResourceError;
use crate::domains::tools::ParamSpec;

/// Markdown reference for every registered tool.
pub struct ToolsHelpResource;

impl ResourceDefinition for ToolsHelpResource {
    const URI: &'static str = "mcp://tools/help";
    const NAME: &'static str = "Tools Help";
    const DESCRIPTION: &'static str = "Usage reference for the tools this server provides";
    const MIME_TYPE: &'static str = "text/markdown";

    fn render(ctx: &ResourceContext<'_>) -> Result<String, ResourceError> {
        let mut out = String::from("# Available tools\n");

        for descriptor in ctx.registry.list() {
            write!(out, "\n## {}\n\n{}\n", descriptor.name(), descriptor.description())
                .map_err(|e| ResourceError::internal(e.to_string()))?;

            if descriptor.params().is_empty() {
                out.push_str("\nNo parameters.\n");
                continue;
            }

            out.push_str("\n| Parameter | Type | Required | Default | Description |\n");
            out.push_str("|---|---|---|---|---|\n");
            for param in descriptor.params() {
                writeln!(out, "{}", param_row(param)).map_err(|e| ResourceError::internal(e.to_string()))?;
            }
        }

        Ok(out)
    }
}

fn param_row(param: &ParamSpec) -> String {
    let default = param
        .default
        .as_ref()
        .map(|v| format!("`{}`", v))
        .unwrap_or_default();
    format!(
        "| `{}` | {} | {} | {} | {} |",
        param.name,
        param.kind.as_str(),
        if param.required { "yes" } else { "no" },
        default,
        param.description
    )
}
