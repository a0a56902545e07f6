//! Expression evaluation error types.

use thiserror::Error;

/// Errors produced while tokenizing, parsing or evaluating an expression.
///
/// Every input string ends in either a value or one of these variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Malformed input. `position` is a character offset into the expression.
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// An identifier outside the allow-list was referenced.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Overflow, NaN, or a result outside a function's domain.
    #[error("Numeric error: {0}")]
    Numeric(String),
}

impl EvalError {
    /// Create a new syntax error at the given character position.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create a new "unknown function" error.
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction(name.into())
    }

    /// Create a new numeric error.
    pub fn numeric(msg: impl Into<String>) -> Self {
        Self::Numeric(msg.into())
    }
}
