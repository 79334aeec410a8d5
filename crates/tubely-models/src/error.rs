//! Model parsing errors.

use thiserror::Error;

/// Result type for model parsing.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while parsing model values from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Invalid storage locator: {0}")]
    InvalidLocator(String),

    #[error("Missing Content-Type")]
    MissingContentType,

    #[error("Invalid Content-Type: {0}")]
    InvalidContentType(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}
