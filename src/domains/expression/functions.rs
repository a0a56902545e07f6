//! The allow-list of callable functions and named constants.
//!
//! This table is the only source of identifiers the evaluator can resolve.
//! Anything not listed here is rejected as an unknown function.

use std::f64::consts;

use super::error::EvalError;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => (min..=max).contains(&count),
            Self::AtLeast(min) => count >= min,
        }
    }

    /// Human-readable description used in error messages.
    pub fn describe(self) -> String {
        match self {
            Self::Exact(1) => "exactly 1 argument".to_string(),
            Self::Exact(n) => format!("exactly {} arguments", n),
            Self::Range(min, max) => format!("{} to {} arguments", min, max),
            Self::AtLeast(1) => "at least 1 argument".to_string(),
            Self::AtLeast(n) => format!("at least {} arguments", n),
        }
    }
}

/// An allow-listed numeric function.
#[derive(Debug)]
pub struct Function {
    pub name: &'static str,
    pub arity: Arity,
    apply: fn(&[f64]) -> Result<f64, EvalError>,
}

impl Function {
    /// Apply the function. Arity has already been checked by the parser.
    pub fn call(&self, args: &[f64]) -> Result<f64, EvalError> {
        (self.apply)(args)
    }
}

/// Allow-listed functions.
pub const FUNCTIONS: &[Function] = &[
    Function { name: "sqrt", arity: Arity::Exact(1), apply: sqrt },
    Function { name: "abs", arity: Arity::Exact(1), apply: |a| Ok(a[0].abs()) },
    Function { name: "round", arity: Arity::Range(1, 2), apply: round },
    Function { name: "min", arity: Arity::AtLeast(1), apply: |a| Ok(a.iter().copied().fold(f64::INFINITY, f64::min)) },
    Function { name: "max", arity: Arity::AtLeast(1), apply: |a| Ok(a.iter().copied().fold(f64::NEG_INFINITY, f64::max)) },
    Function { name: "sum", arity: Arity::AtLeast(1), apply: |a| Ok(a.iter().sum()) },
    Function { name: "pow", arity: Arity::Exact(2), apply: |a| power(a[0], a[1]) },
    Function { name: "sin", arity: Arity::Exact(1), apply: |a| Ok(a[0].sin()) },
    Function { name: "cos", arity: Arity::Exact(1), apply: |a| Ok(a[0].cos()) },
    Function { name: "tan", arity: Arity::Exact(1), apply: |a| Ok(a[0].tan()) },
    Function { name: "log", arity: Arity::Range(1, 2), apply: log },
    Function { name: "log10", arity: Arity::Exact(1), apply: |a| positive(a[0], "log10").map(f64::log10) },
    Function { name: "exp", arity: Arity::Exact(1), apply: |a| Ok(a[0].exp()) },
];

/// Allow-listed named constants.
pub const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

/// Look up an allow-listed function by name.
pub fn lookup_function(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Look up an allow-listed constant by name.
pub fn lookup_constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

/// Raise `base` to `exponent`; a zero base with a negative exponent is a division by zero.
pub fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(base.powf(exponent))
}

fn sqrt(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] < 0.0 {
        return Err(EvalError::numeric("sqrt() of a negative number"));
    }
    Ok(args[0].sqrt())
}

fn positive(value: f64, name: &str) -> Result<f64, EvalError> {
    if value <= 0.0 {
        return Err(EvalError::numeric(format!(
            "{}() requires a positive argument",
            name
        )));
    }
    Ok(value)
}

fn log(args: &[f64]) -> Result<f64, EvalError> {
    let value = positive(args[0], "log")?;
    match args.get(1) {
        None => Ok(value.ln()),
        Some(&base) => {
            let base = positive(base, "log")?;
            if base == 1.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(value.ln() / base.ln())
        }
    }
}

/// Round half to even, optionally to a number of decimal places.
fn round(args: &[f64]) -> Result<f64, EvalError> {
    let value = args[0];
    let Some(&digits) = args.get(1) else {
        return Ok(value.round_ties_even());
    };

    if digits.fract() != 0.0 {
        return Err(EvalError::numeric("round() digits must be an integer"));
    }
    // Beyond this range every f64 is either unchanged or rounds to zero.
    let digits = digits.clamp(-308.0, 308.0) as i32;
    let factor = 10f64.powi(digits);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return Ok(value);
    }
    Ok(scaled.round_ties_even() / factor)
}
