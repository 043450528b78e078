//! Error types for fixture runs

use thiserror::Error;

/// Test error type
#[derive(Error, Debug)]
pub enum TestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error, including malformed hex fields
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Outcome differs from the expectation
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

/// Test result type
pub type TestResult<T> = Result<T, TestError>;
