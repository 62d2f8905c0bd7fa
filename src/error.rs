//! Error handling for Tradeport
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for import operations
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse input file: {0}")]
    Parse(String),

    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

/// Result type alias for import operations
pub type Result<T> = anyhow::Result<T>;
