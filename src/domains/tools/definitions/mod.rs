//! Built-in tool definitions.
//!
//! Each tool is a type exposing `NAME`, `DESCRIPTION`, a `descriptor()`
//! for the registry and a [`ToolHandler`](super::handlers::ToolHandler)
//! implementation.

pub mod calculator;
pub mod text;
pub mod time;
pub mod url;

pub use calculator::CalculatorTool;
pub use text::TextTool;
pub use time::TimeTool;
pub use url::UrlTool;
