//! Configuration management for Issue Beacon
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (BEACON_*)
//! 3. Config file (~/.config/beacon/config.toml)
//! 4. Default values
//!
//! Credentials are deliberately absent: tokens come from the command line or
//! `GITHUB_TOKEN` and are never read from or written to this file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, FilterState, IssueStateFilter, Result, SortField, SortOrder};

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default time a search may take before it is aborted
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,

    /// Abort a search that has not answered within this time
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// User-Agent sent with every request (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("beacon/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Initial search filters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub organization: Option<String>,
    pub label: Option<String>,
    pub state: IssueStateFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub per_page: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            organization: None,
            label: None,
            state: IssueStateFilter::default(),
            sort: SortField::default(),
            order: SortOrder::default(),
            per_page: crate::filter::DEFAULT_PER_PAGE,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API settings
    pub github: GitHubConfig,

    /// Filters a new session starts with
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        FilterState::validate_per_page(config.defaults.per_page)
            .map_err(|e| Error::Config(format!("{} in {}", e, path.display())))?;
        if config.github.timeout.is_zero() {
            return Err(Error::Config(format!(
                "timeout must be greater than zero in {}",
                path.display()
            )));
        }

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/beacon/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("beacon").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - BEACON_API_URL: GitHub API base URL
    /// - BEACON_ORG: Default organization
    /// - BEACON_LABEL: Default label
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_url) = lookup("BEACON_API_URL") {
            self.github.api_url = api_url;
        }

        if let Some(org) = lookup("BEACON_ORG") {
            self.defaults.organization = Some(org);
        }

        if let Some(label) = lookup("BEACON_LABEL") {
            self.defaults.label = Some(label);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>, timeout: Option<Duration>) -> Self {
        if let Some(url) = api_url {
            self.github.api_url = url;
        }

        if let Some(t) = timeout {
            self.github.timeout = t;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(api_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(api_url, timeout))
    }

    /// Filter state a new session starts from
    ///
    /// Organization and label may be empty here; the query builder rejects
    /// them at search time.
    pub fn initial_filters(&self) -> FilterState {
        let defaults = &self.defaults;
        FilterState::new(
            defaults.organization.clone().unwrap_or_default(),
            defaults.label.clone().unwrap_or_default(),
        )
        .with_state(defaults.state)
        .with_sort(defaults.sort)
        .with_order(defaults.order)
        .with_per_page(defaults.per_page)
    }
}
