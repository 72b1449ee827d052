//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required credential field is absent or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
