//! Command-line surface

mod context;
mod resolve;
mod style;

pub use resolve::run;

use clap::Parser;
use std::path::PathBuf;

/// Reconcile backport merge commits with their tracker issues
#[derive(Debug, Parser)]
#[command(name = "backport-resolve", version, about)]
pub struct Cli {
    /// Path inside the release-branch checkout
    #[arg(short = 'C', long = "path", default_value = ".")]
    pub path: PathBuf,

    /// Compute every decision but write nothing and skip delays
    #[arg(long)]
    pub dry_run: bool,

    /// Process only merges referencing this pull request (marker ignored)
    #[arg(long)]
    pub pr: Option<u64>,

    /// Delay in seconds after every real tracker write (floored at 3
    /// to respect the tracker's abuse protection)
    #[arg(long, default_value_t = 5)]
    pub delay: u64,

    /// GitHub repository as owner/name
    #[arg(long, default_value = "ceph/ceph")]
    pub repo: String,

    /// GitHub API token (raises rate limits)
    #[arg(long)]
    pub github_token: Option<String>,

    /// File containing the GitHub API token
    #[arg(long)]
    pub github_token_file: Option<PathBuf>,

    /// Tracker root URL
    #[arg(long, default_value = "https://tracker.ceph.com")]
    pub tracker_url: String,

    /// Tracker project whose version catalog is used
    #[arg(long, default_value = "ceph")]
    pub tracker_project: String,

    /// Tracker API key
    #[arg(long)]
    pub tracker_key: Option<String>,

    /// File containing the tracker API key
    #[arg(long)]
    pub tracker_key_file: Option<PathBuf>,
}
