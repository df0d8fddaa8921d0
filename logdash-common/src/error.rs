//! Common error types for logdash

use thiserror::Error;

/// Common result type for logdash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the pipeline and the dashboard service
#[derive(Error, Debug)]
pub enum Error {
    /// Source file missing or unreadable
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Source file could not be parsed as tabular data
    #[error("Schema error: {0}")]
    Schema(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
