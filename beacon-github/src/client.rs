//! GitHub issue search client
//!
//! The client holds no session state: every call gets the filters and the
//! optional credential it should use, and returns a fresh result.

use std::fmt;
use std::time::Duration;

use beacon_core::config::GitHubConfig;
use beacon_core::{Credential, FilterState};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::issues::{parse_search_response, upstream_message};
use crate::{Error, Issue, Result, SearchQuery};

/// Versioned media type requested from the REST API
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Outcome of one search
pub type QueryResult = Result<Vec<Issue>>;

/// Where a search invocation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Building,
    InFlight,
    Completed,
    Aborted,
    Failed,
}

impl QueryPhase {
    /// Terminal phase a finished search ended in
    pub fn settled(result: &QueryResult) -> Self {
        match result {
            Ok(_) => QueryPhase::Completed,
            Err(e) if e.is_abort() => QueryPhase::Aborted,
            Err(_) => QueryPhase::Failed,
        }
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryPhase::Idle => "idle",
            QueryPhase::Building => "building",
            QueryPhase::InFlight => "in-flight",
            QueryPhase::Completed => "completed",
            QueryPhase::Aborted => "aborted",
            QueryPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Connection settings for [`IssueQueryClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL
    pub api_url: String,
    /// Deadline for a whole search, response body included
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&GitHubConfig::default())
    }
}

impl From<&GitHubConfig> for ClientConfig {
    fn from(config: &GitHubConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for `GET /search/issues`
#[derive(Clone)]
pub struct IssueQueryClient {
    http: reqwest::Client,
    api_base: Url,
    timeout: Duration,
}

impl IssueQueryClient {
    /// Create a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_url)
            .map_err(|e| Error::Client(format!("invalid API URL '{}': {}", config.api_url, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::Client(format!(
                "invalid API URL '{}': not a base URL",
                config.api_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        info!(api_url = %api_base, timeout = ?config.timeout, "Created GitHub search client");

        Ok(Self {
            http,
            api_base,
            timeout: config.timeout,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Search for issues matching `filters`
    ///
    /// `filters` is only read. Failures come back as [`Error`] values; the
    /// client stays usable after any of them.
    pub async fn query(&self, filters: &FilterState, credential: Option<&Credential>) -> QueryResult {
        self.query_with_cancel(filters, credential, CancellationToken::new())
            .await
    }

    /// Search for issues, giving up when `cancel` fires
    ///
    /// When the timeout elapses first, `cancel` is cancelled, the in-flight
    /// request is dropped and [`Error::Timeout`] is returned.
    pub async fn query_with_cancel(
        &self,
        filters: &FilterState,
        credential: Option<&Credential>,
        cancel: CancellationToken,
    ) -> QueryResult {
        debug!(
            phase = %QueryPhase::Building,
            org = %filters.organization,
            label = %filters.label,
            "Building issue search"
        );

        let query = match SearchQuery::from_filters(filters) {
            Ok(query) => query,
            Err(e) => {
                warn!(error = %e, "Rejected search filters");
                return Err(e);
            }
        };

        let url = query.to_url(&self.api_base);
        let mut request = self.http.get(url.clone()).header(ACCEPT, GITHUB_MEDIA_TYPE);
        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, credential.authorization_value());
        }

        debug!(
            phase = %QueryPhase::InFlight,
            url = %url,
            authenticated = credential.is_some(),
            "Sending issue search"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(self.timeout) => {
                cancel.cancel();
                Err(Error::Timeout(self.timeout))
            }
            outcome = execute(request) => outcome,
        };

        let phase = QueryPhase::settled(&result);
        match &result {
            Ok(issues) => info!(%phase, count = issues.len(), "Issue search finished"),
            Err(e) => warn!(%phase, kind = %e.kind(), error = %e, "Issue search failed"),
        }

        result
    }

    /// Run a search on a background task
    ///
    /// The returned handle can abort the search before it completes.
    pub fn spawn_query(&self, filters: FilterState, credential: Option<Credential>) -> QueryHandle {
        let client = self.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        debug!(
            phase = %QueryPhase::Idle,
            org = %filters.organization,
            label = %filters.label,
            "Queued issue search"
        );

        let task = tokio::spawn(async move {
            client
                .query_with_cancel(&filters, credential.as_ref(), token)
                .await
        });

        QueryHandle { cancel, task }
    }
}

impl fmt::Debug for IssueQueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueQueryClient")
            .field("api_base", &self.api_base.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A search running on a background task
#[derive(Debug)]
pub struct QueryHandle {
    cancel: CancellationToken,
    task: JoinHandle<QueryResult>,
}

impl QueryHandle {
    /// Cancel the search; its result becomes [`Error::Cancelled`]
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// Token that fires when the search is aborted or times out
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the search to finish
    pub async fn result(self) -> QueryResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => Err(Error::Network(format!("search task failed: {}", e))),
        }
    }
}

async fn execute(request: RequestBuilder) -> QueryResult {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    interpret(response).await
}

async fn interpret(response: Response) -> QueryResult {
    let status = response.status();
    debug!(status = status.as_u16(), "Received search response");

    match status {
        StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
        StatusCode::FORBIDDEN => Err(Error::RateLimited),
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        s if s.is_success() => {
            let body = response
                .bytes()
                .await
                .map_err(|e| Error::Network(e.to_string()))?;
            parse_search_response(&body)
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("GitHub API returned {}", s.as_u16()));
            Err(Error::Upstream {
                status: s.as_u16(),
                message,
            })
        }
    }
}
