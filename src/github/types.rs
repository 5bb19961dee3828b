use crate::progress::types::GitHubUser;
use serde::Deserialize;

/// Subset of the GitHub REST pull-request object consumed by this tool.
/// The API returns far more fields; serde ignores the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestResponse {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub user: GitHubUser,
    pub created_at: String,
    pub merged_at: Option<String>,
    pub html_url: String,
}

/// Owner and repository name parsed from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = r#"{
            "id": 1,
            "number": 42,
            "title": "Add feature",
            "state": "open",
            "locked": false,
            "user": {"login": "alice", "id": 7, "avatar_url": "https://a.example", "site_admin": false},
            "created_at": "2025-03-01T12:00:00Z",
            "merged_at": null,
            "html_url": "https://github.com/org/repo/pull/42",
            "draft": false
        }"#;
        let pr: PullRequestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.user.login, "alice");
        assert!(pr.merged_at.is_none());
    }
}
