//! GitHub host implementation

use crate::error::{Error, Result};
use crate::host::{HostService, strip_hidden_comments};
use crate::types::PullRequest;
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubHost {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubHost {
    /// Create a new GitHub host for `owner/repo`.
    ///
    /// The token is optional; unauthenticated reads work but run into
    /// much lower rate limits.
    pub fn new(owner: String, repo: String, token: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
        Ok(Self {
            client,
            owner,
            repo,
        })
    }
}

#[async_trait]
impl HostService for GitHubHost {
    async fn fetch_pr(&self, number: u64) -> Result<PullRequest> {
        debug!(number, "fetching pull request");
        let pr = self
            .client
            .pulls(&self.owner, &self.repo)
            .get(number)
            .await?;

        // A payload with neither title nor body means the fetcher's
        // contract with the API is broken, which is fatal to the run.
        if pr.title.is_none() && pr.body.is_none() {
            return Err(Error::ApiProtocol(format!(
                "pull request #{number} response has neither title nor body"
            )));
        }

        let merged = pr.merged_at.is_some();
        if !merged {
            return Err(Error::UnmergedPullRequest(number));
        }

        let result = PullRequest {
            number,
            title: pr.title.unwrap_or_default(),
            body: strip_hidden_comments(&pr.body.unwrap_or_default()),
            merged,
        };
        debug!(number, title = %result.title, "fetched pull request");
        Ok(result)
    }

    fn pr_url(&self, number: u64) -> String {
        format!(
            "https://github.com/{}/{}/pull/{number}",
            self.owner, self.repo
        )
    }
}
