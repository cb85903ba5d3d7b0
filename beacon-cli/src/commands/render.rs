//! Text and JSON output for search results

use beacon_core::FilterState;
use beacon_github::{group_by_repository, Issue, IssueState, RepositoryGroup, TextTone};
use serde::Serialize;

/// Characters of the issue body shown with `--body`
const EXCERPT_CHARS: usize = 150;

/// One-line summary of a finished search
pub fn summary(filters: &FilterState, count: usize) -> String {
    format!(
        "Found {} issues with label \"{}\" in {}",
        count, filters.label, filters.organization
    )
}

/// Print issues grouped by repository
pub fn print_issues(filters: &FilterState, issues: &[Issue], show_body: bool) {
    if issues.is_empty() {
        println!("No issues found.");
        println!(
            "Check that repositories in {} use the \"{}\" label.",
            filters.organization, filters.label
        );
        return;
    }

    println!("{}", summary(filters, issues.len()));
    println!();

    for group in group_by_repository(issues) {
        print_group(&group, show_body);
    }
}

fn print_group(group: &RepositoryGroup, show_body: bool) {
    println!("{} ({} issues)", group.repository, group.len());

    for issue in &group.issues {
        println!("  {}", issue_line(issue));
        println!(
            "      by {} | {} comments | updated {}",
            issue.user.login,
            issue.comments,
            issue.updated_at.format("%Y-%m-%d")
        );
        println!("      {}", issue.html_url);

        if show_body {
            let excerpt = issue.excerpt(EXCERPT_CHARS);
            if !excerpt.is_empty() {
                println!("      {}", excerpt.replace('\n', " "));
            }
        }
    }
    println!();
}

fn issue_line(issue: &Issue) -> String {
    let state_icon = match issue.state {
        IssueState::Open => "○",
        IssueState::Closed => "●",
    };

    let labels = if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        format!(" [{}]", names.join(", "))
    } else {
        String::new()
    };

    format!("{} #{}: {}{}", state_icon, issue.number, issue.title, labels)
}

#[derive(Serialize)]
struct JsonLabel<'a> {
    name: &'a str,
    color: &'a str,
    text_tone: TextTone,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    repository: &'a str,
    count: usize,
    issues: Vec<serde_json::Value>,
}

/// Issue as JSON, with each label carrying the text tone that suits its color
fn json_issue(issue: &Issue) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(issue)?;
    let labels: Vec<JsonLabel<'_>> = issue
        .labels
        .iter()
        .map(|l| JsonLabel {
            name: &l.name,
            color: &l.color,
            text_tone: l.text_tone(),
        })
        .collect();
    value["labels"] = serde_json::to_value(labels)?;
    Ok(value)
}

fn json_groups(groups: &[RepositoryGroup]) -> serde_json::Result<Vec<JsonGroup<'_>>> {
    groups
        .iter()
        .map(|group| {
            Ok(JsonGroup {
                repository: &group.repository,
                count: group.len(),
                issues: group
                    .issues
                    .iter()
                    .map(json_issue)
                    .collect::<serde_json::Result<_>>()?,
            })
        })
        .collect()
}

/// Print issues grouped by repository as pretty JSON
pub fn print_json(issues: &[Issue]) -> anyhow::Result<()> {
    let groups = group_by_repository(issues);
    println!("{}", serde_json::to_string_pretty(&json_groups(&groups)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_github::{Author, Label};

    fn issue(number: u64, repo: &str) -> Issue {
        Issue {
            id: number,
            number,
            title: "Crash on start".to_string(),
            html_url: format!("https://github.com/acme/{}/issues/{}", repo, number),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-02T00:00:00Z".parse().unwrap(),
            state: IssueState::Open,
            comments: 1,
            body: String::new(),
            user: Author::default(),
            labels: vec![Label {
                name: "bug".to_string(),
                color: "d73a4a".to_string(),
            }],
        }
    }

    #[test]
    fn test_summary() {
        let filters = FilterState::new("acme", "good first issue");
        assert_eq!(
            summary(&filters, 3),
            "Found 3 issues with label \"good first issue\" in acme"
        );
    }

    #[test]
    fn test_issue_line() {
        assert_eq!(issue_line(&issue(7, "api")), "○ #7: Crash on start [bug]");
    }

    #[test]
    fn test_json_labels_carry_text_tone() {
        let issues = vec![issue(1, "api"), issue(2, "web")];
        let groups = group_by_repository(&issues);
        let value = serde_json::to_value(json_groups(&groups).unwrap()).unwrap();

        assert_eq!(value[0]["repository"], "api");
        assert_eq!(value[0]["count"], 1);
        assert_eq!(value[1]["issues"][0]["number"], 2);
        let label = &value[0]["issues"][0]["labels"][0];
        assert_eq!(label["color"], "d73a4a");
        assert_eq!(label["text_tone"], "light");
    }
}
