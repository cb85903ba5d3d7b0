//! Search query construction
//!
//! Turns a [`FilterState`] into the `q`, `sort`, `order` and `per_page`
//! parameters of `GET /search/issues`.

use beacon_core::{FilterState, IssueStateFilter, SortField, SortOrder};
use url::Url;

use crate::{Error, Result};

/// A validated issue search, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    sort: SortField,
    order: SortOrder,
    per_page: u8,
}

impl SearchQuery {
    /// Build the search for a set of filters
    ///
    /// Fails with [`Error::InvalidFilter`] when the organization or label is
    /// blank or the page size is out of range, since GitHub would reject the
    /// request anyway.
    pub fn from_filters(filters: &FilterState) -> Result<Self> {
        let organization = filters.organization.trim();
        if organization.is_empty() {
            return Err(Error::InvalidFilter(
                "organization must not be empty".to_string(),
            ));
        }

        // Quotes cannot be escaped inside a quoted search value
        let label = filters.label.trim().replace('"', "");
        if label.is_empty() {
            return Err(Error::InvalidFilter("label must not be empty".to_string()));
        }

        let per_page = FilterState::validate_per_page(filters.per_page)?;

        let mut terms = vec![
            format!("label:\"{}\"", label),
            format!("org:{}", organization),
        ];

        if filters.state != IssueStateFilter::All {
            terms.push(format!("state:{}", filters.state));
        }

        if let Some(language) = filters.language() {
            let language = language.replace('"', "");
            if !language.is_empty() {
                terms.push(format!("language:\"{}\"", language));
            }
        }

        if let Some(repository) = filters.repository() {
            terms.push(format!("repo:{}/{}", organization, repository));
        }

        Ok(Self {
            terms,
            sort: filters.sort,
            order: filters.order,
            per_page,
        })
    }

    /// Individual `key:value` terms, in the order they are sent
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The `q` parameter before URL encoding
    pub fn q(&self) -> String {
        self.terms.join(" ")
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Full search URL below `api_base`
    ///
    /// Parameter values are form-encoded, so the quoted label and the term
    /// separators travel percent-encoded.
    pub fn to_url(&self, api_base: &Url) -> Url {
        let mut url = api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["search", "issues"]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("q", &self.q())
            .append_pair("sort", self.sort.as_str())
            .append_pair("order", self.order.as_str())
            .append_pair("per_page", &self.per_page.to_string());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms_of(filters: &FilterState) -> Vec<String> {
        SearchQuery::from_filters(filters).unwrap().terms().to_vec()
    }

    #[test]
    fn test_minimal_terms() {
        let filters = FilterState::new("rust-lang", "good first issue");
        assert_eq!(
            terms_of(&filters),
            vec![
                "label:\"good first issue\"".to_string(),
                "org:rust-lang".to_string(),
                "state:open".to_string(),
            ]
        );
    }

    #[test]
    fn test_state_all_omits_term() {
        let filters = FilterState::new("org", "bug").with_state(IssueStateFilter::All);
        let terms = terms_of(&filters);
        assert!(!terms.iter().any(|t| t.starts_with("state:")));
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn test_closed_state() {
        let filters = FilterState::new("org", "bug").with_state(IssueStateFilter::Closed);
        assert!(terms_of(&filters).contains(&"state:closed".to_string()));
    }

    #[test]
    fn test_all_refinements() {
        let filters = FilterState::new("phishdirectory", "issue-board")
            .with_language("typescript")
            .with_repository("dashboard");
        assert_eq!(
            terms_of(&filters),
            vec![
                "label:\"issue-board\"".to_string(),
                "org:phishdirectory".to_string(),
                "state:open".to_string(),
                "language:\"typescript\"".to_string(),
                "repo:phishdirectory/dashboard".to_string(),
            ]
        );
    }

    #[test]
    fn test_multi_word_language_is_quoted() {
        let filters = FilterState::new("acme", "bug").with_language("Jupyter Notebook");
        let query = SearchQuery::from_filters(&filters).unwrap();
        assert_eq!(
            query.q(),
            "label:\"bug\" org:acme state:open language:\"Jupyter Notebook\""
        );

        let filters = FilterState::new("acme", "bug").with_language("Visual \"Basic\" .NET");
        assert!(terms_of(&filters).contains(&"language:\"Visual Basic .NET\"".to_string()));

        let filters = FilterState::new("acme", "bug").with_language("\"\"");
        assert!(!terms_of(&filters).iter().any(|t| t.starts_with("language:")));
    }

    #[test]
    fn test_empty_refinements_are_omitted() {
        let mut filters = FilterState::new("org", "bug");
        filters.language = Some(String::new());
        filters.repository = Some("  ".to_string());
        let terms = terms_of(&filters);
        assert!(!terms.iter().any(|t| t.starts_with("language:")));
        assert!(!terms.iter().any(|t| t.starts_with("repo:")));
    }

    #[test]
    fn test_empty_organization_rejected() {
        let filters = FilterState::new("", "bug");
        let err = SearchQuery::from_filters(&filters).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));

        let filters = FilterState::new("   ", "bug");
        assert!(SearchQuery::from_filters(&filters).is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        let filters = FilterState::new("org", "");
        let err = SearchQuery::from_filters(&filters).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
    }

    #[test]
    fn test_page_size_out_of_range_rejected() {
        let filters = FilterState::new("org", "bug").with_per_page(0);
        assert!(matches!(
            SearchQuery::from_filters(&filters),
            Err(Error::InvalidFilter(_))
        ));
        let filters = FilterState::new("org", "bug").with_per_page(101);
        assert!(SearchQuery::from_filters(&filters).is_err());
    }

    #[test]
    fn test_default_parameters() {
        let query = SearchQuery::from_filters(&FilterState::new("org", "bug")).unwrap();
        assert_eq!(query.sort(), SortField::Updated);
        assert_eq!(query.order(), SortOrder::Desc);
        assert_eq!(query.per_page(), 30);
    }

    #[test]
    fn test_url_parameters() {
        let filters = FilterState::new("rust-lang", "good first issue")
            .with_sort(SortField::Comments)
            .with_order(SortOrder::Asc)
            .with_per_page(10);
        let query = SearchQuery::from_filters(&filters).unwrap();
        let base = Url::parse("https://api.github.com").unwrap();
        let url = query.to_url(&base);

        assert_eq!(url.path(), "/search/issues");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "q".to_string(),
                    "label:\"good first issue\" org:rust-lang state:open".to_string()
                ),
                ("sort".to_string(), "comments".to_string()),
                ("order".to_string(), "asc".to_string()),
                ("per_page".to_string(), "10".to_string()),
            ]
        );
        assert!(url.as_str().contains("label%3A%22good+first+issue%22"));
    }

    #[test]
    fn test_url_keeps_base_path() {
        let query = SearchQuery::from_filters(&FilterState::new("org", "bug")).unwrap();
        let base = Url::parse("https://github.example.com/api/v3/").unwrap();
        assert_eq!(query.to_url(&base).path(), "/api/v3/search/issues");
    }
}
