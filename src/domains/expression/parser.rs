//! Recursive-descent parser and tree evaluator.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/' | '%') unary)*
//! unary          := ('+' | '-') unary | power
//! power          := primary (('^' | '**') unary)?
//! primary        := NUMBER | '(' additive ')' | IDENT '(' args ')' | IDENT
//! args           := (additive (',' additive)*)?
//! ```
//!
//! Identifiers resolve only against the allow-list in [`super::functions`].

use super::error::EvalError;
use super::functions::{self, Function};
use super::lexer::{Token, TokenKind};

/// Maximum nesting of parentheses, unary operators and exponents.
pub const MAX_DEPTH: usize = 64;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Sub => Ok(lhs - rhs),
            Self::Mul => Ok(lhs * rhs),
            Self::Div if rhs == 0.0 => Err(EvalError::DivisionByZero),
            Self::Div => Ok(lhs / rhs),
            Self::Rem if rhs == 0.0 => Err(EvalError::DivisionByZero),
            Self::Rem => {
                // Sign follows the divisor: -7 % 3 == 2.
                let r = lhs % rhs;
                if r != 0.0 && (r < 0.0) != (rhs < 0.0) {
                    Ok(r + rhs)
                } else {
                    Ok(r)
                }
            }
            Self::Pow => functions::power(lhs, rhs),
        }
    }
}

/// A parsed expression tree.
///
/// Runs of left-associative operators are kept flat in [`Expr::Chain`], so
/// the tree depth is bounded by [`MAX_DEPTH`] however long the input is.
#[derive(Debug)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Power {
        base: Box<Expr>,
        exponent: Box<Expr>,
    },
    /// `first op1 rest1 op2 rest2 ...`, folded left to right.
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Call {
        function: &'static Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree. Every intermediate value must be finite.
    pub fn eval(&self) -> Result<f64, EvalError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Neg(inner) => -inner.eval()?,
            Self::Power { base, exponent } => BinaryOp::Pow.apply(base.eval()?, exponent.eval()?)?,
            Self::Chain { first, rest } => {
                let mut acc = first.eval()?;
                for (op, operand) in rest {
                    acc = ensure_finite(op.apply(acc, operand.eval()?)?)?;
                }
                acc
            }
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(Expr::eval)
                    .collect::<Result<Vec<_>, _>>()?;
                function.call(&values)?
            }
        };
        ensure_finite(value)
    }
}

fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain {
            first: Box::new(first),
            rest,
        }
    }
}

fn ensure_finite(value: f64) -> Result<f64, EvalError> {
    if value.is_nan() {
        Err(EvalError::numeric("result is not a number"))
    } else if value.is_infinite() {
        Err(EvalError::numeric("result overflowed"))
    } else {
        Ok(value)
    }
}

/// Parse a token stream into an expression tree.
///
/// `end` is the character length of the source, reported as the position
/// of "unexpected end" errors.
pub fn parse_tokens(tokens: &[Token], end: usize) -> Result<Expr, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::syntax(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        end,
    };
    let expr = parser.additive()?;

    if let Some(token) = parser.peek() {
        return Err(EvalError::syntax(
            token.pos,
            format!("unexpected {}", token.kind),
        ));
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn end_of_input(&self) -> EvalError {
        EvalError::syntax(self.end, "unexpected end of expression")
    }

    fn additive(&mut self) -> Result<Expr, EvalError> {
        let first = self.multiplicative()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.multiplicative()?));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, EvalError> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.unary()?));
        }
    }

    // Every recursive cycle in the grammar passes through here.
    fn unary(&mut self) -> Result<Expr, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let position = self.peek().map_or(self.end, |t| t.pos);
            return Err(EvalError::syntax(
                position,
                format!("expression nested deeper than {} levels", MAX_DEPTH),
            ));
        }

        let expr = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Expr::Neg(Box::new(self.unary()?))
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };

        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.peek_is(&TokenKind::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Power {
                base: Box::new(base),
                exponent: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.next().ok_or_else(|| self.end_of_input())?;

        match &token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(*value)),
            TokenKind::LParen => {
                let inner = self.additive()?;
                match self.next() {
                    Some(t) if t.kind == TokenKind::RParen => Ok(inner),
                    Some(t) => Err(EvalError::syntax(
                        t.pos,
                        format!("expected ')' but found {}", t.kind),
                    )),
                    None => Err(EvalError::syntax(
                        token.pos,
                        "unbalanced parenthesis: '(' is never closed",
                    )),
                }
            }
            TokenKind::Ident(name) if self.peek_is(&TokenKind::LParen) => {
                let open = self.next().map_or(self.end, |t| t.pos);
                let args = self.call_args(open)?;
                let function =
                    functions::lookup_function(name).ok_or_else(|| EvalError::unknown_function(name))?;
                if !function.arity.accepts(args.len()) {
                    return Err(EvalError::syntax(
                        token.pos,
                        format!(
                            "{}() takes {} ({} given)",
                            name,
                            function.arity.describe(),
                            args.len()
                        ),
                    ));
                }
                Ok(Expr::Call { function, args })
            }
            TokenKind::Ident(name) => match functions::lookup_constant(name) {
                Some(value) => Ok(Expr::Number(value)),
                None if functions::lookup_function(name).is_some() => Err(EvalError::syntax(
                    token.pos,
                    format!("{name} must be called, e.g. {name}(...)"),
                )),
                None => Err(EvalError::unknown_function(name)),
            },
            other => Err(EvalError::syntax(
                token.pos,
                format!("unexpected {}", other),
            )),
        }
    }

    /// Parse call arguments after the opening parenthesis at `open`.
    fn call_args(&mut self, open: usize) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.peek_is(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }

        loop {
            args.push(self.additive()?);
            match self.next() {
                Some(t) if t.kind == TokenKind::Comma => continue,
                Some(t) if t.kind == TokenKind::RParen => return Ok(args),
                Some(t) => {
                    return Err(EvalError::syntax(
                        t.pos,
                        format!("expected ',' or ')' but found {}", t.kind),
                    ));
                }
                None => {
                    return Err(EvalError::syntax(
                        open,
                        "unbalanced parenthesis: '(' is never closed",
                    ));
                }
            }
        }
    }
}
