pub mod types;

pub use types::{GitDiffStat, ProgressData, PullRequestModel};

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Failed to access progress file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse progress file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Checkpoint store for batch runs.
///
/// All state lives in one JSON file per `(date, owner, repo)` key under
/// `output_dir`; nothing is cached in memory. A run that is interrupted
/// and restarted picks up from the last saved checkpoint via `init`.
pub struct ProgressStore {
    output_dir: PathBuf,
}

impl ProgressStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Path of the progress file for a `(date, owner, repo)` key,
    /// e.g. `output/2025-03-01-rust-lang-cargo-progress.json`.
    pub fn file_path(&self, date: &str, owner: &str, repo: &str) -> PathBuf {
        self.output_dir
            .join(format!("{date}-{owner}-{repo}-progress.json"))
    }

    /// Read the checkpoint for a key. A missing file is not an error and
    /// returns `Ok(None)`; any other read or parse failure propagates.
    pub fn load(
        &self,
        date: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Option<ProgressData>, ProgressError> {
        let path = self.file_path(date, owner, repo);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no progress file found");
                return Ok(None);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read progress file");
                return Err(e.into());
            }
        };
        let progress = serde_json::from_str(&contents)?;
        Ok(Some(progress))
    }

    /// Write the checkpoint for a key, creating the output directory if
    /// needed. Overwrites unconditionally; there is exactly one writer.
    pub fn save(
        &self,
        progress: &ProgressData,
        date: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), ProgressError> {
        let path = self.file_path(date, owner, repo);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(progress)?;
        fs::write(&path, json).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to write progress file");
            e
        })?;
        debug!(path = %path.display(), "progress saved");
        Ok(())
    }

    /// Resume entry point. If a checkpoint already exists for the key, its
    /// stored list wins and the freshly fetched `pull_requests` argument is
    /// discarded; otherwise the fresh list becomes the new checkpoint.
    /// Re-running against the same key is therefore idempotent.
    pub fn init(
        &self,
        pull_requests: Vec<PullRequestModel>,
        date: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequestModel>, ProgressError> {
        if let Some(existing) = self.load(date, owner, repo)? {
            info!(owner, repo, date, "progress file already exists, resuming from checkpoint");
            return Ok(existing.pull_requests);
        }

        info!(owner, repo, date, prs = pull_requests.len(), "creating progress file");
        self.save(
            &ProgressData {
                pull_requests: pull_requests.clone(),
            },
            date,
            owner,
            repo,
        )?;
        Ok(pull_requests)
    }

    /// Replace the `diff` and `processed` fields of the single entry matching
    /// `(number, owner, repo)`, persist the full list under today's date key,
    /// and return it. A missing target is logged and leaves the list
    /// unchanged.
    pub fn update(
        &self,
        mut pull_requests: Vec<PullRequestModel>,
        number: u64,
        owner: &str,
        repo: &str,
        diff: Option<GitDiffStat>,
        processed: bool,
    ) -> Result<Vec<PullRequestModel>, ProgressError> {
        let mut matched = false;
        for pr in pull_requests.iter_mut() {
            if pr.number == number && pr.owner == owner && pr.repo == repo {
                pr.diff = diff.clone();
                pr.processed = processed;
                matched = true;
            }
        }
        if !matched {
            warn!(number, owner, repo, "no progress entry matched, nothing updated");
        }

        self.save(
            &ProgressData {
                pull_requests: pull_requests.clone(),
            },
            &today(),
            owner,
            repo,
        )?;
        Ok(pull_requests)
    }
}

/// Today's date in the `YYYY-MM-DD` form used for progress file keys.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
