use crate::progress::PullRequestModel;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("Failed to write CSV file: {0}")]
    FileWrite(#[from] std::io::Error),
}

const HEADER: &str =
    "id,number,title,created_at,merged_at,authorName,avatar_url,url,addedLines,deletedLines,totalLines";

/// Render pull requests as CSV with flattened diff columns.
///
/// Titles and author logins are double-quoted (internal `"` doubled in the
/// title); numeric and diff fields are unquoted. A missing diff renders as
/// three empty trailing fields, a missing `merged_at` as an empty field.
/// Empty input yields an empty string.
pub fn render(pull_requests: &[PullRequestModel]) -> String {
    if pull_requests.is_empty() {
        return String::new();
    }

    let rows = pull_requests.iter().map(|pr| {
        let quoted_title = format!("\"{}\"", pr.title.replace('"', "\"\""));
        let (added, deleted, total) = match &pr.diff {
            Some(diff) => (
                diff.added_lines.to_string(),
                diff.deleted_lines.to_string(),
                diff.total_lines.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        format!(
            "{},{},{},{},{},\"{}\",{},{},{},{},{}",
            pr.id,
            pr.number,
            quoted_title,
            pr.created_at,
            pr.merged_at.as_deref().unwrap_or(""),
            pr.user.login,
            pr.user.avatar_url,
            pr.html_url,
            added,
            deleted,
            total,
        )
    });

    std::iter::once(HEADER.to_string())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render and write the CSV export to `path`.
#[instrument(skip(pull_requests), fields(rows = pull_requests.len()))]
pub fn write(pull_requests: &[PullRequestModel], path: &Path) -> Result<(), CsvError> {
    let csv = render(pull_requests);
    std::fs::write(path, csv)?;
    debug!(path = %path.display(), "CSV export written");
    Ok(())
}
