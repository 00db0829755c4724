//! Progress marker
//!
//! A movable tag recording the last successfully processed merge commit.
//! This is the batch's only durable state: losing it merely causes the
//! next run to rescan from wherever the marker is recreated, which is
//! safe because already-resolved trackers validate as no-ops.

use crate::error::{Error, Result};
use crate::repo::GitRepo;
use crate::version::Version;
use tracing::{debug, info};

/// The movable pointer bounding marker-driven batches
#[derive(Debug, Clone)]
pub struct ProgressMarker {
    name: String,
}

impl ProgressMarker {
    /// Marker for a named release, e.g. `backport-resolve/reef`.
    #[must_use]
    pub fn for_release(release: &str) -> Self {
        Self {
            name: format!("backport-resolve/{release}"),
        }
    }

    /// Tag name of this marker.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The commit the marker currently points at.
    pub fn position(&self, repo: &GitRepo) -> Result<String> {
        repo.tag_target(&self.name)
    }

    /// Create the marker at HEAD if it does not exist yet, returning the
    /// commit it points at.
    ///
    /// HEAD's nearest release tag must map to `release`; creating a reef
    /// marker on a quincy branch is a process error, not a default.
    pub fn ensure_exists(&self, repo: &GitRepo, release: &str) -> Result<String> {
        if repo.tag_exists(&self.name)? {
            return self.position(repo);
        }
        let head = repo.head()?;
        let head_release = Version::from_describe(&repo.describe(&head)?)?.release()?;
        if head_release != release {
            return Err(Error::Git(format!(
                "HEAD is on release \"{head_release}\", refusing to create marker for \"{release}\""
            )));
        }
        repo.create_tag(&self.name, &head)?;
        info!(marker = %self.name, commit = %head, "created progress marker at HEAD");
        Ok(head)
    }

    /// Move the marker to `commit`.
    ///
    /// git has no atomic tag-move for lightweight tags; delete+recreate is
    /// the protocol, and a run interrupted between the two steps is
    /// repaired by the next `ensure_exists`.
    pub fn advance(&self, repo: &GitRepo, commit: &str) -> Result<()> {
        if repo.tag_exists(&self.name)? {
            repo.delete_tag(&self.name)?;
        }
        repo.create_tag(&self.name, commit)?;
        debug!(marker = %self.name, commit, "advanced progress marker");
        Ok(())
    }
}
