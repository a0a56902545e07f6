//! Tokenizer for arithmetic expressions.
//!
//! Scans left to right in a single pass; there is no backtracking.

use std::fmt;

use super::error::EvalError;

/// Token types for the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `^` or `**`
    Caret,
    LParen,
    RParen,
    Comma,
}

/// A token with its character offset in the source expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {}", n),
            Self::Ident(name) => write!(f, "identifier '{}'", name),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Percent => f.write_str("'%'"),
            Self::Caret => f.write_str("'^'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

/// Tokenize an expression into a vector of positioned tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match ch {
            '+' => {
                pos += 1;
                TokenKind::Plus
            }
            '-' => {
                pos += 1;
                TokenKind::Minus
            }
            '*' if chars.get(pos + 1) == Some(&'*') => {
                pos += 2;
                TokenKind::Caret
            }
            '*' => {
                pos += 1;
                TokenKind::Star
            }
            '/' => {
                pos += 1;
                TokenKind::Slash
            }
            '%' => {
                pos += 1;
                TokenKind::Percent
            }
            '^' => {
                pos += 1;
                TokenKind::Caret
            }
            '(' => {
                pos += 1;
                TokenKind::LParen
            }
            ')' => {
                pos += 1;
                TokenKind::RParen
            }
            ',' => {
                pos += 1;
                TokenKind::Comma
            }
            c if c.is_ascii_digit() || c == '.' => {
                let (value, end) = scan_number(&chars, pos)?;
                pos = end;
                TokenKind::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                TokenKind::Ident(chars[start..pos].iter().collect())
            }
            other => {
                return Err(EvalError::syntax(
                    pos,
                    format!("unexpected character '{}'", other),
                ));
            }
        };

        tokens.push(Token { kind, pos: start });
    }

    Ok(tokens)
}

/// Scan a decimal literal with optional fraction and exponent.
///
/// Returns the parsed value and the offset just past the literal.
fn scan_number(chars: &[char], start: usize) -> Result<(f64, usize), EvalError> {
    let mut pos = start;
    let mut digits = 0;

    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
        digits += 1;
    }

    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
            digits += 1;
        }
    }

    if digits == 0 {
        return Err(EvalError::syntax(start, "malformed number"));
    }

    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut look = pos + 1;
        if look < chars.len() && (chars[look] == '+' || chars[look] == '-') {
            look += 1;
        }
        let exponent_start = look;
        while look < chars.len() && chars[look].is_ascii_digit() {
            look += 1;
        }
        if look == exponent_start {
            return Err(EvalError::syntax(pos, "malformed exponent"));
        }
        pos = look;
    }

    // "1.2.3" or "1e5.0"
    if pos < chars.len() && chars[pos] == '.' {
        return Err(EvalError::syntax(pos, "malformed number"));
    }

    let text: String = chars[start..pos].iter().collect();
    let value: f64 = text
        .parse()
        .map_err(|_| EvalError::syntax(start, format!("malformed number '{}'", text)))?;

    if !value.is_finite() {
        return Err(EvalError::numeric(format!(
            "number literal '{}' is out of range",
            text
        )));
    }

    Ok((value, pos))
}
