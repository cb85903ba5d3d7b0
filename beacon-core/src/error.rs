//! Error types for Issue Beacon

use thiserror::Error;

/// Result type alias for Issue Beacon core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Issue Beacon core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filter value could not be parsed or is out of range
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}
