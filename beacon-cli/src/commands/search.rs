//! Search command - one issue search, printed grouped by repository

use beacon_core::{Config, Credential, FilterState, IssueStateFilter, SortField, SortOrder};
use beacon_github::{ClientConfig, IssueQueryClient};
use clap::{Args, ValueEnum};

use super::render;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Organization to search (defaults to the configured one)
    #[arg(short, long)]
    pub org: Option<String>,

    /// Label the issues must carry (defaults to the configured one)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Only repositories written in this language
    #[arg(long)]
    pub language: Option<String>,

    /// Only this repository within the organization
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Filter by state
    #[arg(short, long)]
    pub state: Option<StateFilter>,

    /// Sort results by
    #[arg(long)]
    pub sort: Option<SortArg>,

    /// Sort direction
    #[arg(long)]
    pub order: Option<OrderArg>,

    /// Number of results (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub per_page: Option<u8>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Include a short excerpt of each issue body
    #[arg(long)]
    pub body: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl From<StateFilter> for IssueStateFilter {
    fn from(filter: StateFilter) -> Self {
        match filter {
            StateFilter::Open => IssueStateFilter::Open,
            StateFilter::Closed => IssueStateFilter::Closed,
            StateFilter::All => IssueStateFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Created,
    Updated,
    Comments,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Created => SortField::Created,
            SortArg::Updated => SortField::Updated,
            SortArg::Comments => SortField::Comments,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

impl SearchArgs {
    /// Layer the command-line filters over the configured defaults
    pub fn filters(&self, base: FilterState) -> FilterState {
        let mut filters = base;

        if let Some(org) = &self.org {
            filters.organization = org.clone();
        }
        if let Some(label) = &self.label {
            filters.label = label.clone();
        }
        if let Some(language) = &self.language {
            filters = filters.with_language(language.as_str());
        }
        if let Some(repo) = &self.repo {
            filters = filters.with_repository(repo.as_str());
        }
        if let Some(state) = self.state {
            filters.state = state.into();
        }
        if let Some(sort) = self.sort {
            filters.sort = sort.into();
        }
        if let Some(order) = self.order {
            filters.order = order.into();
        }
        if let Some(per_page) = self.per_page {
            filters.per_page = per_page;
        }

        filters
    }

    /// Execute the search command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let filters = self.filters(config.initial_filters());
        let credential = Credential::from_input(self.token.clone());

        if verbose {
            tracing::info!(
                org = %filters.organization,
                label = %filters.label,
                authenticated = credential.is_some(),
                "Starting issue search"
            );
        }

        let client = IssueQueryClient::new(ClientConfig::from(&config.github))?;
        let issues = client
            .query(&filters, credential.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if self.json {
            render::print_json(&issues)?;
        } else {
            render::print_issues(&filters, &issues, self.body);
        }

        Ok(())
    }
}
