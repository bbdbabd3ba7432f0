//! Error types for spuquant-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// spuquant error type
#[derive(Error, Debug)]
pub enum Error {
    /// Memory allocation failed while growing a buffer
    #[error("memory allocation failed")]
    AllocationFailed,

    /// A colour channel was outside `[0, 255]`
    #[error("colour components must be in [0 .. 255], got {0}")]
    InvalidColorValue(i64),

    /// A host property held a value of the wrong type
    #[error("property '{name}': a {expected} is required")]
    InvalidPropertyType {
        name: &'static str,
        expected: &'static str,
    },

    /// Channel count does not agree with the alpha flag
    #[error(
        "image must have 3 components, excluding alpha (got {channels} channels, has_alpha={has_alpha})"
    )]
    ChannelMismatch { channels: u32, has_alpha: bool },

    /// Byte buffer length is not a whole number of pixels
    #[error("buffer length {len} is not a multiple of {multiple}")]
    InvalidBufferLength { len: usize, multiple: usize },

    /// Buffer too short for the described geometry
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::AllocationFailed
    }
}

/// Result type alias for spuquant operations
pub type Result<T> = std::result::Result<T, Error>;
