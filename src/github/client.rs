use super::types::PullRequestResponse;
use super::{GitHubError, PullRequestSource};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "gh-pr-stats";
const API_VERSION: &str = "2022-11-28";

/// GitHub REST API client. Built from an explicit token; no process-wide
/// state. Unauthenticated requests work but hit a much lower rate limit.
pub struct GitHubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn request(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    /// Fetch all pull requests for a repository, following the Link header
    /// until no `rel="next"` page remains.
    #[instrument(skip(self))]
    async fn get_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequestResponse>, GitHubError> {
        let mut url = Some(format!(
            "{API_BASE}/repos/{owner}/{repo}/pulls?state=all&per_page=100"
        ));
        let mut all_pulls = Vec::new();

        while let Some(page_url) = url {
            debug!(url = %page_url, "fetching pull request page");
            let response = self
                .request(&page_url, "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| transport_error(e, "Error fetching pull requests"))?;

            if !response.status().is_success() {
                warn!(status = %response.status(), url = %page_url, "pull request fetch failed");
                return Err(error_from_status(
                    response.status(),
                    "Error fetching pull requests",
                ));
            }

            url = next_page_url(
                response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok()),
            );

            let pulls: Vec<PullRequestResponse> = response
                .json()
                .await
                .map_err(|e| transport_error(e, "Error decoding pull requests"))?;
            debug!(page = pulls.len(), cumulative = all_pulls.len() + pulls.len(), "received page");
            all_pulls.extend(pulls);
        }

        Ok(all_pulls)
    }

    #[instrument(skip(self))]
    async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, GitHubError> {
        let url = format!("{API_BASE}/repos/{owner}/{repo}/pulls/{number}");
        let context = format!("Error fetching diff for PR #{number}");

        let response = self
            .request(&url, "application/vnd.github.v3.diff")
            .send()
            .await
            .map_err(|e| transport_error(e, &context))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), number, "diff fetch failed");
            return Err(error_from_status(response.status(), &context));
        }

        let diff = response
            .text()
            .await
            .map_err(|e| transport_error(e, &context))?;
        debug!(diff_bytes = diff.len(), "received diff");
        Ok(diff)
    }
}

/// Map an HTTP status to the error taxonomy. 403 is treated as the rate
/// limiter since that is what GitHub returns when the quota is exhausted;
/// 406 is the documented response for oversized diffs.
fn error_from_status(status: StatusCode, context: &str) -> GitHubError {
    match status {
        StatusCode::FORBIDDEN => GitHubError::RateLimitExceeded,
        StatusCode::NOT_FOUND => GitHubError::NotFound(context.to_string()),
        StatusCode::NOT_ACCEPTABLE => GitHubError::DiffTooLarge,
        _ => GitHubError::Network(format!("{context}: HTTP status {status}")),
    }
}

fn transport_error(error: reqwest::Error, context: &str) -> GitHubError {
    if error.is_connect() || error.is_timeout() {
        GitHubError::Network(format!("{context}: {error}"))
    } else {
        GitHubError::Unknown(format!("{context}: {error}"))
    }
}

/// Extract the `rel="next"` URL from a Link header, if any.
fn next_page_url(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;
    for link in header.split(',') {
        if !link.contains("rel=\"next\"") {
            continue;
        }
        let start = link.find('<')?;
        let end = link.find('>')?;
        if start < end {
            return Some(link[start + 1..end].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_status_mapping() {
        assert!(matches!(
            error_from_status(StatusCode::FORBIDDEN, "ctx"),
            GitHubError::RateLimitExceeded
        ));
        assert!(matches!(
            error_from_status(StatusCode::NOT_FOUND, "ctx"),
            GitHubError::NotFound(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::NOT_ACCEPTABLE, "ctx"),
            GitHubError::DiffTooLarge
        ));
        assert!(matches!(
            error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "ctx"),
            GitHubError::Network(_)
        ));
    }

    #[test]
    fn test_next_page_url_extraction() {
        let header = "<https://api.github.com/repos/o/r/pulls?page=2>; rel=\"next\", \
                      <https://api.github.com/repos/o/r/pulls?page=5>; rel=\"last\"";
        assert_eq!(
            next_page_url(Some(header)),
            Some("https://api.github.com/repos/o/r/pulls?page=2".to_string())
        );
    }

    #[test]
    fn test_next_page_url_last_page() {
        let header = "<https://api.github.com/repos/o/r/pulls?page=4>; rel=\"prev\", \
                      <https://api.github.com/repos/o/r/pulls?page=1>; rel=\"first\"";
        assert_eq!(next_page_url(Some(header)), None);
        assert_eq!(next_page_url(None), None);
    }
}
