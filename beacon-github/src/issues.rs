//! Issue records returned by the search endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Author of an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
    /// Profile page
    pub html_url: String,
}

impl Default for Author {
    fn default() -> Self {
        // GitHub shows deleted accounts as "ghost"
        Self {
            login: "ghost".to_string(),
            avatar_url: String::new(),
            html_url: "https://github.com/ghost".to_string(),
        }
    }
}

/// Whether text drawn on a label should be dark or light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    Dark,
    Light,
}

/// Issue label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Six hex digits, no leading `#`
    pub color: String,
}

impl Label {
    /// Text tone that stays readable on this label's color
    pub fn text_tone(&self) -> TextTone {
        let hex = self.color.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .map(f64::from)
        };

        match (hex.len(), channel(0), channel(2), channel(4)) {
            (6, Some(r), Some(g), Some(b)) => {
                let luminance = (0.299 * r + 0.587 * g + 0.114 * b) / 255.0;
                if luminance > 0.5 {
                    TextTone::Dark
                } else {
                    TextTone::Light
                }
            }
            _ => TextTone::Dark,
        }
    }
}

/// GitHub issue as returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    /// Web page of the issue
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: IssueState,
    /// Number of comments
    pub comments: u64,
    /// Issue body, empty when GitHub has none
    pub body: String,
    pub user: Author,
    /// Labels in the order GitHub lists them
    pub labels: Vec<Label>,
}

impl Issue {
    /// Repository name taken from the issue's web URL
    ///
    /// `https://github.com/<owner>/<repo>/issues/<n>` yields `<repo>`.
    pub fn repository_name(&self) -> Option<String> {
        let url = url::Url::parse(&self.html_url).ok()?;
        let mut segments = url.path_segments()?;
        segments.next().filter(|owner| !owner.is_empty())?;
        let repo = segments.next().filter(|repo| !repo.is_empty())?;
        Some(repo.to_string())
    }

    /// Body shortened to at most `max_chars` characters
    pub fn excerpt(&self, max_chars: usize) -> String {
        let body = self.body.trim();
        if body.chars().count() <= max_chars {
            return body.to_string();
        }
        let cut: String = body.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    login: String,
    #[serde(default)]
    avatar_url: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
    #[serde(default)]
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    id: u64,
    number: u64,
    title: String,
    html_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    state: IssueState,
    #[serde(default)]
    comments: u64,
    body: Option<String>,
    user: Option<RawAuthor>,
    #[serde(default)]
    labels: Vec<RawLabel>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            id: raw.id,
            number: raw.number,
            title: raw.title,
            html_url: raw.html_url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            state: raw.state,
            comments: raw.comments,
            body: raw.body.unwrap_or_default(),
            user: raw
                .user
                .map(|u| Author {
                    login: u.login,
                    avatar_url: u.avatar_url,
                    html_url: u.html_url,
                })
                .unwrap_or_default(),
            labels: raw
                .labels
                .into_iter()
                .map(|l| Label {
                    name: l.name,
                    color: l.color,
                })
                .collect(),
        }
    }
}

/// Body of a successful `GET /search/issues`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<RawIssue>>,
}

/// Body of a failed request
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Parse a search response body into issues, keeping GitHub's order
///
/// A missing or null `items` array means no results.
pub(crate) fn parse_search_response(body: &[u8]) -> Result<Vec<Issue>> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| Error::Network(format!("Failed to parse search response: {}", e)))?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(Issue::from)
        .collect())
}

/// Extract the `message` field GitHub puts in error bodies
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}
