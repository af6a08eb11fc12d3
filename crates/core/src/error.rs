//! Error types for the estampa content-stream library.

use thiserror::Error;

/// Primary error type for content-stream interpretation.
///
/// Interpretation itself is best-effort and degrades per element; these
/// errors surface only from constructors and API-boundary validation.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("soft mask buffer has {got} samples, expected {expected}")]
    SoftMaskShape { expected: usize, got: usize },

    #[error("image buffer has {got} bytes, expected {expected}")]
    ImageShape { expected: usize, got: usize },

    #[error("page {0} not present in document")]
    PageOutOfRange(usize),

    /// For [`ResourceResolver`](crate::resources::ResourceResolver)
    /// implementations that want a typed miss.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}

/// Convenience Result type alias for ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;
