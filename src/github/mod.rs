pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{PullRequestResponse, RepoRef};

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of the GitHub fetch collaborator.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Pull request diff is too large")]
    DiffTooLarge,

    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected GitHub API failure: {0}")]
    Unknown(String),
}

/// Source of pull-request metadata and diffs. Seam between the
/// orchestrator and the GitHub REST API.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch all pull requests for a repository, following pagination.
    async fn get_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequestResponse>, GitHubError>;

    /// Fetch the unified diff of a single pull request as text.
    async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, GitHubError>;
}

/// Parse a repository URL into owner and repo name.
///
/// Expected form: `https://github.com/{owner}/{repo}`.
pub fn parse_repo_url(url: &str) -> Result<RepoRef, GitHubError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| GitHubError::InvalidUrl(url.to_string()))?;

    if parsed.host_str() != Some("github.com") {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(|| GitHubError::InvalidUrl(url.to_string()))?
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() != 2 {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    Ok(RepoRef {
        owner: segments[0].to_string(),
        repo: segments[1].trim_end_matches(".git").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_repo_url() {
        let repo = parse_repo_url("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.repo, "cargo");
    }

    #[test]
    fn test_parse_repo_url_strips_git_suffix() {
        let repo = parse_repo_url("https://github.com/rust-lang/cargo.git").unwrap();
        assert_eq!(repo.repo, "cargo");
    }

    #[test]
    fn test_parse_invalid_repo_url() {
        assert!(parse_repo_url("not-a-url").is_err());
        assert!(parse_repo_url("https://example.com/org/repo").is_err());
        assert!(parse_repo_url("https://github.com/only-owner").is_err());
        assert!(parse_repo_url("https://github.com/org/repo/pull/42").is_err());
    }
}
