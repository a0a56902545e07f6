//! Resources domain module.
//!
//! Resources are read-only documents clients can fetch by URI. This server
//! publishes generated documentation about its tools.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::{ResourceContext, ResourceDefinition};
pub use error::ResourceError;
pub use registry::{get_all_resources, resource_uris};
pub use service::{ResourceEntry, ResourceService};
