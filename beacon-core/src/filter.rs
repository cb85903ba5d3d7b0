//! Search filter state
//!
//! A [`FilterState`] is owned by the caller for the whole session and is only
//! ever read by the query client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of results requested per search
pub const DEFAULT_PER_PAGE: u8 = 30;

/// Largest page size the search endpoint accepts
pub const MAX_PER_PAGE: u8 = 100;

/// Issue state to search for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    /// No state restriction (the `state:` term is omitted)
    All,
}

impl IssueStateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
            IssueStateFilter::All => "all",
        }
    }
}

/// Field the search results are sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Created,
    #[default]
    Updated,
    Comments,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::Updated => "updated",
            SortField::Comments => "comments",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

macro_rules! impl_text {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| Error::InvalidFilter(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

impl_text!(
    IssueStateFilter,
    "state",
    [IssueStateFilter::Open, IssueStateFilter::Closed, IssueStateFilter::All]
);
impl_text!(
    SortField,
    "sort field",
    [SortField::Created, SortField::Updated, SortField::Comments]
);
impl_text!(SortOrder, "sort order", [SortOrder::Asc, SortOrder::Desc]);

/// Filters used to build an issue search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Organization whose repositories are searched
    pub organization: String,
    /// Label the issues must carry
    pub label: String,
    /// Restrict to repositories written in this language
    pub language: Option<String>,
    /// Restrict to a single repository within the organization
    pub repository: Option<String>,
    pub state: IssueStateFilter,
    pub sort: SortField,
    pub order: SortOrder,
    /// Results per page, `1..=100`
    pub per_page: u8,
}

impl FilterState {
    /// Create filters for an organization and label with default refinements
    pub fn new(organization: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            label: label.into(),
            language: None,
            repository: None,
            state: IssueStateFilter::default(),
            sort: SortField::default(),
            order: SortOrder::default(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = non_blank(language.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = non_blank(repository.into());
        self
    }

    pub fn with_state(mut self, state: IssueStateFilter) -> Self {
        self.state = state;
        self
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Language filter, if set to something other than blank text
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Repository filter, if set to something other than blank text
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Clear every refinement while keeping organization and label
    pub fn reset_refinements(&mut self) {
        let organization = std::mem::take(&mut self.organization);
        let label = std::mem::take(&mut self.label);
        *self = Self::new(organization, label);
    }

    /// Check a page size is within the range the search endpoint accepts
    pub fn validate_per_page(per_page: u8) -> Result<u8> {
        if (1..=MAX_PER_PAGE).contains(&per_page) {
            Ok(per_page)
        } else {
            Err(Error::InvalidFilter(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PER_PAGE, per_page
            )))
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filters = FilterState::new("rust-lang", "good first issue");
        assert_eq!(filters.state, IssueStateFilter::Open);
        assert_eq!(filters.sort, SortField::Updated);
        assert_eq!(filters.order, SortOrder::Desc);
        assert_eq!(filters.per_page, 30);
        assert!(filters.language().is_none());
        assert!(filters.repository().is_none());
    }

    #[test]
    fn test_blank_refinements_are_absent() {
        let filters = FilterState::new("org", "bug")
            .with_language("   ")
            .with_repository("");
        assert!(filters.language.is_none());
        assert!(filters.repository.is_none());

        let mut filters = FilterState::new("org", "bug");
        filters.language = Some(" ".to_string());
        assert!(filters.language().is_none());
    }

    #[test]
    fn test_reset_refinements_keeps_org_and_label() {
        let mut filters = FilterState::new("org", "help wanted")
            .with_language("rust")
            .with_repository("api")
            .with_state(IssueStateFilter::All)
            .with_sort(SortField::Comments)
            .with_order(SortOrder::Asc)
            .with_per_page(5);

        filters.reset_refinements();

        assert_eq!(filters, FilterState::new("org", "help wanted"));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Closed".parse::<IssueStateFilter>().unwrap(), IssueStateFilter::Closed);
        assert_eq!(" all ".parse::<IssueStateFilter>().unwrap(), IssueStateFilter::All);
        assert_eq!("comments".parse::<SortField>().unwrap(), SortField::Comments);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_display_matches_wire_value() {
        assert_eq!(IssueStateFilter::Open.to_string(), "open");
        assert_eq!(SortField::Created.to_string(), "created");
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }

    #[test]
    fn test_validate_per_page() {
        assert_eq!(FilterState::validate_per_page(1).unwrap(), 1);
        assert_eq!(FilterState::validate_per_page(100).unwrap(), 100);
        assert!(FilterState::validate_per_page(0).is_err());
        assert!(FilterState::validate_per_page(101).is_err());
    }
}
