mod config;
mod csv;
mod diff;
mod github;
mod progress;

use clap::Parser;
use colored::Colorize;
use github::{PullRequestSource, RepoRef};
use progress::{ProgressStore, PullRequestModel};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// Delay between PR diff fetches, to stay friendly with the API.
const FETCH_DELAY: Duration = Duration::from_millis(500);

/// gh-pr-stats — collects line-change statistics for the pull requests of a
/// list of GitHub repositories, with a resumable per-day checkpoint.
#[derive(Parser, Debug)]
#[command(name = "gh-pr-stats", version, about)]
struct Cli {
    /// Repository URLs (https://github.com/org/repo). Overrides the
    /// `repositories` list from the config file when given.
    repositories: Vec<String>,

    /// Path to a config file (defaults to .gh-pr-stats.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a CSV export of all processed pull requests to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let cfg = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };

    let repositories = if cli.repositories.is_empty() {
        cfg.repositories.clone()
    } else {
        cli.repositories.clone()
    };
    if repositories.is_empty() {
        return Err(
            "No repositories given. List them in .gh-pr-stats.toml or on the command line.".into(),
        );
    }

    let client = github::GitHubClient::new(cfg.github_token());
    let store = ProgressStore::new(cfg.output_dir());
    let date = progress::today();

    let mut all_rows: Vec<PullRequestModel> = Vec::new();
    for repo_url in &repositories {
        let repo = github::parse_repo_url(repo_url)?;
        let _span = info_span!("repository", owner = %repo.owner, repo = %repo.repo).entered();

        let rows = process_repository(&client, &store, &repo, &date).await?;
        all_rows.extend(rows);
    }

    let processed = all_rows.iter().filter(|pr| pr.processed).count();
    let unknown = all_rows
        .iter()
        .filter(|pr| pr.processed && pr.diff.is_none())
        .count();
    println!(
        "{} {} pull requests across {} repositories ({} with unknown diff)",
        "Done:".green().bold(),
        processed,
        repositories.len(),
        unknown,
    );

    if let Some(path) = &cli.csv {
        csv::write(&all_rows, path)?;
        println!("{} {}", "CSV written to".green(), path.display());
    }

    Ok(())
}

/// Fetch, checkpoint, and process one repository's pull requests.
///
/// Resumes from an existing checkpoint for `(date, owner, repo)`: entries
/// already marked processed are skipped. A failed diff fetch does not halt
/// the run; the entry is checkpointed with `diff = None` ("diff unknown",
/// distinct from an empty diff) and marked processed.
async fn process_repository(
    source: &dyn PullRequestSource,
    store: &ProgressStore,
    repo: &RepoRef,
    date: &str,
) -> Result<Vec<PullRequestModel>, Box<dyn std::error::Error>> {
    info!("fetching pull requests");
    let fetched = source.get_pull_requests(&repo.owner, &repo.repo).await?;
    if fetched.is_empty() {
        info!("no pull requests found");
        return Ok(Vec::new());
    }
    info!(count = fetched.len(), "fetched pull request list");

    let models = fetched
        .iter()
        .map(|pr| to_model(pr, &repo.owner, &repo.repo))
        .collect();
    let mut checkpoint = store.init(models, date, &repo.owner, &repo.repo)?;

    let pending: Vec<u64> = checkpoint
        .iter()
        .filter(|pr| !pr.processed)
        .map(|pr| pr.number)
        .collect();
    let skipped = checkpoint.len() - pending.len();
    if skipped > 0 {
        info!(skipped, "skipping already-processed pull requests");
    }

    for number in pending {
        let diff = match source
            .get_pull_request_diff(&repo.owner, &repo.repo, number)
            .await
        {
            Ok(text) => {
                let stat = diff::compute_diff_stats(&text);
                info!(number, changes = stat.total_lines, "computed diff stats");
                Some(stat)
            }
            Err(e) => {
                warn!(number, error = %e, "diff fetch failed, recording as unknown");
                None
            }
        };

        checkpoint = store.update(checkpoint, number, &repo.owner, &repo.repo, diff, true)?;
        tokio::time::sleep(FETCH_DELAY).await;
    }

    Ok(checkpoint)
}

/// Map a GitHub API response into the domain model with fresh processing
/// state.
fn to_model(pr: &github::PullRequestResponse, owner: &str, repo: &str) -> PullRequestModel {
    PullRequestModel {
        id: pr.id,
        number: pr.number,
        owner: owner.to_string(),
        repo: repo.to_string(),
        title: pr.title.clone(),
        created_at: pr.created_at.clone(),
        merged_at: pr.merged_at.clone(),
        user: pr.user.clone(),
        html_url: pr.html_url.clone(),
        diff: None,
        processed: false,
    }
}
