//! Error types for spuquant-index

use thiserror::Error;

/// Errors that can occur during quantization and index packing
#[derive(Debug, Error)]
pub enum IndexError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] spuquant_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A pixel has no palette index under the active policy
    #[error("pixel {0:#010x} has no palette index")]
    UnmappedColor(u32),

    /// Packed bitmap shorter than its geometry requires
    #[error("bitmap too small: need {needed} bytes, got {actual}")]
    BitmapTooSmall { needed: usize, actual: usize },
}

impl From<std::collections::TryReserveError> for IndexError {
    fn from(e: std::collections::TryReserveError) -> Self {
        IndexError::Core(e.into())
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
