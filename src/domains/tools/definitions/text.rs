//! Text processing tool definition.

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{Arguments, ParamSpec, ParamType, ToolDescriptor};

/// Operations accepted by the `op` parameter, including aliases.
pub const SUPPORTED_OPERATIONS: &[&str] = &[
    "count_words",
    "count_chars",
    "length",
    "upper",
    "to_upper",
    "lower",
    "to_lower",
    "reverse",
];

/// A text transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOperation {
    CountWords,
    CountChars,
    Length,
    Upper,
    Lower,
    Reverse,
}

impl TextOperation {
    /// Parse an operation name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "count_words" => Some(Self::CountWords),
            "count_chars" => Some(Self::CountChars),
            "length" => Some(Self::Length),
            "upper" | "to_upper" => Some(Self::Upper),
            "lower" | "to_lower" => Some(Self::Lower),
            "reverse" => Some(Self::Reverse),
            _ => None,
        }
    }

    /// Apply the operation.
    ///
    /// Lengths count Unicode scalar values, not bytes.
    pub fn apply(self, text: &str) -> Value {
        match self {
            Self::CountWords => json!(text.split_whitespace().count()),
            Self::CountChars => json!({
                "with_spaces": text.chars().count(),
                "without_spaces": text.chars().filter(|c| *c != ' ').count(),
            }),
            Self::Length => json!(text.chars().count()),
            Self::Upper => Value::String(text.to_uppercase()),
            Self::Lower => Value::String(text.to_lowercase()),
            Self::Reverse => Value::String(text.chars().rev().collect()),
        }
    }
}

/// Text tool - simple string transforms and counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTool;

impl TextTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "text_tool";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Process text. Operations: count_words, count_chars, length, \
         upper (to_upper), lower (to_lower), reverse.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(ParamSpec::required("text", ParamType::String, "Text to process"))
            .param(
                ParamSpec::optional("op", ParamType::String, "Operation to perform")
                    .with_default("count_words"),
            )
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(op = %op))]
    pub fn execute(text: &str, op: &str) -> Result<Value, ToolError> {
        info!("Text tool called on {} character(s)", text.chars().count());

        let operation = TextOperation::parse(op).ok_or_else(|| {
            ToolError::unsupported_operation(format!(
                "'{}' (supported: {})",
                op,
                SUPPORTED_OPERATIONS.join(", ")
            ))
        })?;

        Ok(operation.apply(text))
    }
}

impl ToolHandler for TextTool {
    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        let op = args.opt_str("op")?.unwrap_or("count_words");
        Self::execute(args.str("text")?, op)
    }
}
