//! Tools domain module.
//!
//! Tools are synchronous functions the model can call by name. They are
//! described by a [`ToolDescriptor`], registered once in a
//! [`ToolRegistryBuilder`] and then served from an immutable
//! [`ToolRegistry`].
//!
//! ## Architecture
//!
//! - `definitions/` - Built-in tool implementations (one file per tool)
//! - `schema.rs` - Parameter specs, JSON Schema rendering and argument validation
//! - `handlers.rs` - The `ToolHandler` trait and request/result envelopes
//! - `registry.rs` - Registration and fault-isolated dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Provide a `descriptor()` and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `ToolRegistryBuilder::register_builtins`
//!
//! The router and the HTTP transport pick it up from the registry.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;
pub mod schema;

pub use error::{ErrorKind, ToolError};
pub use handlers::*;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use router::build_tool_router;
pub use schema::{Arguments, ParamSpec, ParamType, ToolDescriptor};
