//! Grouping search results by repository

use std::collections::HashMap;

use serde::Serialize;

use crate::Issue;

/// Group name for issues whose URL does not name a repository
pub const UNKNOWN_REPOSITORY: &str = "Unknown";

/// Issues belonging to one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryGroup {
    pub repository: String,
    pub issues: Vec<Issue>,
}

impl RepositoryGroup {
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Group issues by the repository in their URL
///
/// Groups appear in the order their first issue appears, and each group keeps
/// the search order of its issues.
pub fn group_by_repository(issues: &[Issue]) -> Vec<RepositoryGroup> {
    let mut groups: Vec<RepositoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for issue in issues {
        let repository = issue
            .repository_name()
            .unwrap_or_else(|| UNKNOWN_REPOSITORY.to_string());

        let slot = *index.entry(repository.clone()).or_insert_with(|| {
            groups.push(RepositoryGroup {
                repository,
                issues: Vec::new(),
            });
            groups.len() - 1
        });

        groups[slot].issues.push(issue.clone());
    }

    groups
}
