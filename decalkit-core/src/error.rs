//! Error types for decalkit

use thiserror::Error;

/// Main error type for decalkit operations
///
/// A ray that misses the surface is not an error: it is reported through
/// `SurfaceHit::intersects` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for decalkit operations
pub type Result<T> = std::result::Result<T, Error>;
