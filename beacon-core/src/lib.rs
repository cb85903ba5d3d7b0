//! Beacon Core - Core types for Issue Beacon
//!
//! This crate holds everything about a search that is independent of the
//! network: the filter state, the user's credential, the caller-owned
//! session and configuration loading.

pub mod config;
pub mod credential;
pub mod error;
pub mod filter;
pub mod session;

pub use config::Config;
pub use credential::Credential;
pub use error::{Error, Result};
pub use filter::{FilterState, IssueStateFilter, SortField, SortOrder};
pub use session::{QueryTicket, Session};
