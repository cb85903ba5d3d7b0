//! Error types for GitHub issue searches
//!
//! Every way a search can fail is a variant here, so callers receive failures
//! as data and can render the message directly.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while searching for issues
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Organization or label missing, or another filter out of range
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// HTTP 401
    #[error("Invalid GitHub token. Please check your token and try again.")]
    Unauthorized,

    /// HTTP 403
    ///
    /// GitHub also answers 403 for some authorization failures, which end up
    /// here too.
    #[error("API rate limit exceeded. Please add a GitHub token to increase your limit.")]
    RateLimited,

    /// HTTP 404
    #[error("Organization not found. Please check the organization name.")]
    NotFound,

    /// Any other non-success status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// No response before the deadline; the request was aborted
    #[error("GitHub did not respond within {} seconds", .0.as_secs_f32())]
    Timeout(Duration),

    /// The caller cancelled the search
    #[error("Search cancelled")]
    Cancelled,

    /// Transport failure or unreadable response body
    #[error("Network error: {0}")]
    Network(String),

    /// The HTTP client could not be set up
    #[error("Failed to create GitHub client: {0}")]
    Client(String),
}

/// Failure category of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFilter,
    Unauthorized,
    RateLimited,
    NotFound,
    UpstreamError,
    Timeout,
    Cancelled,
    NetworkError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidFilter => "invalid filter",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::NotFound => "not found",
            ErrorKind::UpstreamError => "upstream error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::NetworkError => "network error",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Error::Unauthorized => ErrorKind::Unauthorized,
            Error::RateLimited => ErrorKind::RateLimited,
            Error::NotFound => ErrorKind::NotFound,
            Error::Upstream { .. } => ErrorKind::UpstreamError,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Network(_) | Error::Client(_) => ErrorKind::NetworkError,
        }
    }

    /// Whether the request was cut short rather than answered
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Cancelled)
    }
}

impl From<beacon_core::Error> for Error {
    fn from(err: beacon_core::Error) -> Self {
        match err {
            beacon_core::Error::InvalidFilter(msg) => Error::InvalidFilter(msg),
            other => Error::Client(other.to_string()),
        }
    }
}
