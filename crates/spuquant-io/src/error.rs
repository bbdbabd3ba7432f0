//! I/O error types
//!
//! Each format module maps its underlying library errors into `IoError`
//! variants so that callers only need to handle one error type.

use thiserror::Error;

/// Error type for paletted image I/O.
///
/// Wraps encoder/decoder errors as well as standard I/O and errors from the
/// core and index crates.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error from the byte source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bitmap or palette cannot be represented in the output format
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. allocation failure)
    #[error("core error: {0}")]
    Core(#[from] spuquant_core::Error),

    /// An error from the index crate (e.g. bitmap geometry)
    #[error("index error: {0}")]
    Index(#[from] spuquant_index::IndexError),
}

impl From<std::collections::TryReserveError> for IoError {
    fn from(e: std::collections::TryReserveError) -> Self {
        IoError::Core(e.into())
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
