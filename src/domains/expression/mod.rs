//! Expression domain module.
//!
//! A restricted arithmetic evaluator used by the `calculator` tool. It
//! understands numeric literals, `+ - * / % ^`, parentheses and the
//! functions and constants listed in [`functions`]. There is no variable
//! binding and no other name resolution, so no input string can do anything
//! beyond arithmetic.
//!
//! ## Architecture
//!
//! - `lexer.rs` - Single-pass tokenizer
//! - `parser.rs` - Recursive-descent parser and tree evaluator
//! - `functions.rs` - Allow-listed functions and constants
//! - `error.rs` - Evaluation error types

mod error;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use error::EvalError;
pub use parser::{Expr, MAX_DEPTH};

/// Maximum accepted expression length in bytes.
pub const MAX_EXPRESSION_LEN: usize = 4096;

/// Parse an expression into a tree without evaluating it.
pub fn parse(expression: &str) -> Result<Expr, EvalError> {
    if expression.len() > MAX_EXPRESSION_LEN {
        return Err(EvalError::syntax(
            0,
            format!("expression longer than {} bytes", MAX_EXPRESSION_LEN),
        ));
    }

    let tokens = lexer::tokenize(expression)?;
    parser::parse_tokens(&tokens, expression.chars().count())
}

/// Evaluate an arithmetic expression.
///
/// ```
/// use basic_tools_mcp::domains::expression::evaluate;
///
/// assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
/// ```
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    parse(expression)?.eval()
}

/// Render a result the way it is shown to users: integral values without a
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0.0
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
