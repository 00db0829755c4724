//! Error types for backport-resolve

use thiserror::Error;

/// All errors the engine can produce.
///
/// The taxonomy splits two ways: item-level faults are caught at the batch
/// loop and turn into a restricted disposition menu for the operator;
/// run-level faults propagate and terminate the process with a non-zero
/// status. See [`Error::is_item_recoverable`].
#[derive(Debug, Error)]
pub enum Error {
    /// The merge-log line does not reference a pull request, or its short
    /// hash does not resolve to exactly one commit.
    #[error("malformed merge commit: {0}")]
    MalformedMergeCommit(String),

    /// The referenced pull request has not been merged.
    #[error("pull request #{0} is not merged")]
    UnmergedPullRequest(u64),

    /// The pull request description references no Backport tracker issue.
    #[error("pull request #{0} references no backport tracker issue")]
    NoBackportTrackerFound(u64),

    /// The tracker issue's release field disagrees with the branch release.
    #[error("tracker issue {issue}: release field is \"{actual}\", branch release is \"{expected}\"")]
    ReleaseMismatch {
        /// Tracker issue id
        issue: u64,
        /// Release implied by the branch
        expected: String,
        /// Release recorded on the issue (or "unset")
        actual: String,
    },

    /// The tracker issue's target version disagrees with the computed one.
    #[error("tracker issue {issue}: target version is \"{actual}\", computed target is \"{expected}\"")]
    TargetVersionConflict {
        /// Tracker issue id
        issue: u64,
        /// Computed target version
        expected: String,
        /// Target version recorded on the issue
        actual: String,
    },

    /// A remote API response violated its contract (e.g. a pull request
    /// payload with neither title nor body). Always fatal to the run.
    #[error("API contract violation: {0}")]
    ApiProtocol(String),

    /// No named release is known for a version's `major.minor` prefix.
    #[error("no release known for version {0}")]
    UnknownRelease(String),

    /// The computed target version is not in the tracker's version catalog,
    /// or crosses into a different release than its base.
    #[error("cannot resolve target version {0}")]
    UnresolvedVersion(String),

    /// GitHub API failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Issue-tracker API failure
    #[error("tracker API error: {0}")]
    Tracker(String),

    /// git query failure
    #[error("git error: {0}")]
    Git(String),

    /// Credential or configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reading the operator's disposition
    #[error("prompt error: {0}")]
    Prompt(String),

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

impl Error {
    /// Whether this fault is confined to one batch item.
    ///
    /// Recoverable faults are caught by the batch loop and offered to the
    /// operator as abort/ignore; everything else terminates the run.
    #[must_use]
    pub const fn is_item_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedMergeCommit(_)
                | Self::UnmergedPullRequest(_)
                | Self::NoBackportTrackerFound(_)
                | Self::ReleaseMismatch { .. }
                | Self::TargetVersionConflict { .. }
        )
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
