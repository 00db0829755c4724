//! Shared command context
//!
//! Bundles the setup every run needs: the repository, the two remote
//! services, the run-scoped catalog cache, and the branch's release.

use crate::cli::Cli;
use crate::cli::style::{Stylize, check, spinner_style};
use backport_resolve::auth::{CredentialSources, resolve_credentials};
use backport_resolve::error::{Error, Result};
use backport_resolve::host::{GitHubHost, HostService};
use backport_resolve::repo::GitRepo;
use backport_resolve::tracker::{CatalogCache, RedmineTracker, TrackerService};
use backport_resolve::version::Version;
use indicatif::ProgressBar;
use std::time::Duration;

/// Everything a run needs, constructed once at startup
pub struct CommandContext {
    /// The release-branch checkout
    pub repo: GitRepo,
    /// Code-host service
    pub host: Box<dyn HostService>,
    /// Issue-tracker service
    pub tracker: Box<dyn TrackerService>,
    /// Run-scoped tracker catalogs
    pub catalogs: CatalogCache,
    /// Named release of the checked-out branch
    pub release: String,
}

impl CommandContext {
    /// Build the context: open the repo, resolve credentials, create the
    /// services, load the catalogs, and derive the branch release from
    /// HEAD's nearest release tag.
    pub async fn new(cli: &Cli) -> Result<Self> {
        let repo = GitRepo::open(&cli.path)?;

        let credentials = resolve_credentials(&CredentialSources {
            github_token: cli.github_token.clone(),
            github_token_file: cli.github_token_file.clone(),
            tracker_key: cli.tracker_key.clone(),
            tracker_key_file: cli.tracker_key_file.clone(),
        })?;

        let (owner, name) = cli
            .repo
            .split_once('/')
            .ok_or_else(|| Error::Config(format!("--repo must be owner/name, got {}", cli.repo)))?;
        let host: Box<dyn HostService> = Box::new(GitHubHost::new(
            owner.to_string(),
            name.to_string(),
            credentials.github_token.as_deref(),
        )?);

        let tracker: Box<dyn TrackerService> = Box::new(RedmineTracker::new(
            &cli.tracker_url,
            cli.tracker_project.clone(),
            credentials.tracker_key,
        )?);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Loading tracker catalogs...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        let catalogs = CatalogCache::load(tracker.as_ref()).await?;
        spinner.finish_with_message(format!("{} Loaded tracker catalogs", check()));

        let head = repo.head()?;
        let release = Version::from_describe(&repo.describe(&head)?)?
            .release()?
            .to_string();
        anstream::println!("Branch release: {}", release.accent());

        Ok(Self {
            repo,
            host,
            tracker,
            catalogs,
            release,
        })
    }
}
