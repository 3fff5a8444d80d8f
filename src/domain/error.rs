//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::Side;

/// Domain errors represent tree-building and input violations.
/// These are independent of storage concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid value '{input}': expected {expected}")]
    InvalidValue {
        input: String,
        expected: &'static str,
    },

    #[error("node count must not exceed {limit} (requested {requested})")]
    NodeLimitExceeded { requested: usize, limit: usize },

    #[error("node count must be at least 1")]
    ZeroNodes,

    #[error("node already has a {0} child")]
    ChildExists(Side),

    #[error("node not found in tree")]
    NodeNotFound,

    #[error("node still has children and cannot be removed")]
    NotALeaf,

    #[error("input closed: {0}")]
    InputClosed(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
