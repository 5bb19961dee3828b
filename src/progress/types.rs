use serde::{Deserialize, Serialize};

/// Line-change statistics computed from a unified diff.
///
/// Invariant: `total_lines == added_lines + deleted_lines`.
/// Serialized field names match the progress-file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitDiffStat {
    #[serde(rename = "addedLines")]
    pub added_lines: u64,
    #[serde(rename = "deletedLines")]
    pub deleted_lines: u64,
    #[serde(rename = "totalLines")]
    pub total_lines: u64,
}

/// Subset of the GitHub user object that the tool actually reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
}

/// A pull request together with its processing state.
///
/// Uniquely keyed by `(number, owner, repo)` within a progress file.
/// Created with `processed = false` and `diff = None` when a repository's
/// PR list is first fetched; updated in place once its diff is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestModel {
    pub id: u64,
    pub number: u64,
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub created_at: String,
    pub merged_at: Option<String>,
    pub user: GitHubUser,
    pub html_url: String,
    pub diff: Option<GitDiffStat>,
    pub processed: bool,
}

/// On-disk unit of persistence, one file per `(date, owner, repo)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    #[serde(rename = "pullRequests")]
    pub pull_requests: Vec<PullRequestModel>,
}
