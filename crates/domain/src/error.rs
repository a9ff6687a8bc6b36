//! Domain error types

use thiserror::Error;

/// Errors raised while selecting groups or evaluating JSON paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A check group number is outside the catalog.
    #[error("unknown check group: {0}")]
    UnknownGroup(String),

    /// A JSON path expression is malformed.
    #[error("invalid JSON path: {0}")]
    InvalidJsonPath(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
