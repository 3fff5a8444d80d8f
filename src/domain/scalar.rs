//! Scalar node values

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Value stored on a tree node.
///
/// Trees built randomly or interactively hold integers, flat-list trees hold
/// floats. Booleans and text only show up in hand-edited files; traversals
/// treat them as non-numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    /// Numeric view used for ordering, `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Bool(_) | Scalar::Text(_) => None,
        }
    }

    /// Parse operator input as an integer value.
    pub fn parse_int(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        trimmed
            .parse::<i64>()
            .map(Scalar::Int)
            .map_err(|_| DomainError::InvalidValue {
                input: trimmed.to_string(),
                expected: "integer",
            })
    }

    /// Parse operator input as a floating point value.
    pub fn parse_float(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        trimmed
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| DomainError::InvalidValue {
                input: trimmed.to_string(),
                expected: "number",
            })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            // Debug keeps the decimal point on whole floats: 5.0, not 5
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}
