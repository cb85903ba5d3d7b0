//! Beacon GitHub - GitHub issue search for Issue Beacon
//!
//! This crate turns filter state into GitHub search requests, runs them with
//! a timeout and cancellation, and normalizes every response into either a
//! list of issues or a typed error.

mod client;
mod error;
mod grouping;
mod issues;
mod query;

pub use client::{
    ClientConfig, IssueQueryClient, QueryHandle, QueryPhase, QueryResult, GITHUB_MEDIA_TYPE,
};
pub use error::{Error, ErrorKind, Result};
pub use grouping::{group_by_repository, RepositoryGroup, UNKNOWN_REPOSITORY};
pub use issues::{Author, Issue, IssueState, Label, TextTone};
pub use query::SearchQuery;
