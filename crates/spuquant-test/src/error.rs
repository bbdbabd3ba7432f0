//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to write a regression output file
    #[error("failed to write '{path}': {message}")]
    OutputWrite { path: String, message: String },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
