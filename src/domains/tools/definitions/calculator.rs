//! Calculator tool definition.
//!
//! Evaluates arithmetic with the restricted evaluator in
//! [`crate::domains::expression`]. Nothing else is reachable from the
//! expression string.

use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::expression::{self, format_number};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{Arguments, ParamSpec, ParamType, ToolDescriptor};

/// Structured output of a successful calculation.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CalculatorOutput {
    pub expression: String,
    pub result: f64,
    /// `"<expression> = <result>"`
    pub display: String,
}

/// Calculator tool - safe arithmetic evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculator";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Safely evaluate an arithmetic expression. Supports + - * / % ^, \
         parentheses, the functions sqrt, abs, round, min, max, pow, sum, sin, cos, tan, log, log10, exp \
         and the constants pi and e. Example: \"sqrt(16) + 2 * 3\".";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(ParamSpec::required(
                "expression",
                ParamType::String,
                "Arithmetic expression, e.g. \"2 + 3 * 4\" or \"sqrt(16)\"",
            ))
            .with_output_schema(cached_schema_for_type::<CalculatorOutput>())
    }

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub fn execute(expression: &str) -> Result<CalculatorOutput, ToolError> {
        info!("Calculator tool called for: {}", expression);

        let result = expression::evaluate(expression)?;
        Ok(CalculatorOutput {
            expression: expression.to_string(),
            result,
            display: format!("{} = {}", expression.trim(), format_number(result)),
        })
    }
}

impl ToolHandler for CalculatorTool {
    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        let output = Self::execute(args.str("expression")?)?;
        serde_json::to_value(output).map_err(|e| ToolError::handler(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use serde_json::json;

    fn call(expression: &str) -> Result<Value, ToolError> {
        let args = Arguments::new(json!({ "expression": expression }).as_object().cloned().unwrap());
        CalculatorTool.call(&args)
    }

    #[test]
    fn test_calculator_success() {
        let value = call("sqrt(16) + 2 * 3").unwrap();
        assert_eq!(value["result"], json!(10.0));
        assert_eq!(value["display"], "sqrt(16) + 2 * 3 = 10");
        assert_eq!(value["expression"], "sqrt(16) + 2 * 3");
    }

    #[test]
    fn test_calculator_failure_kinds() {
        assert_eq!(call("").unwrap_err().kind(), ErrorKind::SyntaxError);
        assert_eq!(call("(").unwrap_err().kind(), ErrorKind::SyntaxError);
        assert_eq!(call("1/0").unwrap_err().kind(), ErrorKind::DivisionByZero);
        assert_eq!(call("foo(1)").unwrap_err().kind(), ErrorKind::UnknownFunction);
        assert_eq!(call("sqrt(-4)").unwrap_err().kind(), ErrorKind::NumericError);
    }

    #[test]
    fn test_descriptor() {
        let descriptor = CalculatorTool::descriptor();
        assert_eq!(descriptor.name(), "calculator");
        assert!(descriptor.output_schema().is_some());
        let schema = descriptor.input_schema();
        assert_eq!(schema["required"], json!(["expression"]));
    }
}
