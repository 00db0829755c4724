//! Core types for backport-resolve

use crate::version::Version;
use serde::{Deserialize, Serialize};

/// One merge commit under reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCommitRecord {
    /// Abbreviated commit hash as it appeared in the merge log
    pub short_hash: String,
    /// Full commit hash (unambiguously resolved)
    pub full_hash: String,
    /// One-line commit description
    pub summary: String,
}

/// A pull request as fetched from the code host
///
/// The body has hidden `<!-- ... -->` template blocks already stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR description with comment blocks stripped
    pub body: String,
    /// Whether the PR has been merged
    pub merged: bool,
}

/// A tracker issue as fetched from the issue tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerIssue {
    /// Issue id
    pub id: u64,
    /// Issue subject line
    pub subject: String,
    /// Current status name (e.g. "In Progress", "Resolved")
    pub status: String,
    /// Tracker-type name (e.g. "Backport", "Bug")
    pub tracker_type: String,
    /// The "Release" custom field, if set
    pub release_field: Option<String>,
    /// The target-version field, if set
    pub target_version: Option<String>,
    /// Issue description text
    pub description: String,
}

/// A validated tracker reference with its pending-update flags
///
/// Part of a [`BackportAggregate`]; one PR may reference several backport
/// trackers (e.g. split work).
#[derive(Debug, Clone)]
pub struct TrackerRef {
    /// The underlying tracker issue
    pub issue: TrackerIssue,
    /// The issue is not yet "Resolved"
    pub needs_status_update: bool,
    /// The issue has no target version set
    pub needs_target_version_update: bool,
    /// The issue description does not link back to the PR
    pub needs_backlink: bool,
}

impl TrackerRef {
    /// Whether any field on the issue needs to change.
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_status_update || self.needs_target_version_update || self.needs_backlink
    }
}

/// Everything known about one backport merge, fully validated
///
/// Invariant: `trackers` is non-empty; construction fails with
/// `NoBackportTrackerFound` otherwise.
#[derive(Debug, Clone)]
pub struct BackportAggregate {
    /// The merge commit that landed the backport
    pub merge: MergeCommitRecord,
    /// The pull request the merge came from
    pub pr: PullRequest,
    /// Nearest release version reachable from the merge commit
    pub base_version: Version,
    /// The version the backport trackers should be resolved against
    pub target_version: Version,
    /// Named release implied by the branch
    pub release: String,
    /// Backport tracker issues referenced by the PR, first-seen order
    pub trackers: Vec<TrackerRef>,
}

/// A field patch to send to the tracker for one issue
///
/// Fields left `None` are not touched by the update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerPatch {
    /// Issue to update
    #[serde(skip)]
    pub issue_id: u64,
    /// New status id (Resolved)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    /// New target-version id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_version_id: Option<u64>,
    /// Replacement description (back-link prepended)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Audit note recording the source PR and merge commit
    pub notes: String,
}

/// Operator decision for one batch item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Terminate the entire run immediately with a non-zero exit
    Abort,
    /// Skip updates for this item (marker still advances in marker mode)
    Ignore,
    /// Apply pending updates for every validated tracker in the item
    Update,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Ignore => write!(f, "ignore"),
            Self::Update => write!(f, "update"),
        }
    }
}
