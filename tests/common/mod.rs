//! Shared test fixtures
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

pub mod mocks;

use backport_resolve::repo::GitRepo;
use backport_resolve::types::{PullRequest, TrackerIssue};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A merged PR whose body references the given tracker issues.
pub fn merged_pr(number: u64, issue_ids: &[u64]) -> PullRequest {
    let body = issue_ids
        .iter()
        .map(|id| format!("https://tracker.ceph.com/issues/{id}"))
        .collect::<Vec<_>>()
        .join("\n");
    PullRequest {
        number,
        title: format!("reef: backport #{number}"),
        body,
        merged: true,
    }
}

/// A Backport tracker issue awaiting resolution (no target version, no
/// back-link, status "In Progress").
pub fn pending_backport_issue(id: u64, release: &str) -> TrackerIssue {
    TrackerIssue {
        id,
        subject: format!("{release}: pending backport {id}"),
        status: "In Progress".to_string(),
        tracker_type: "Backport".to_string(),
        release_field: Some(release.to_string()),
        target_version: None,
        description: "Backport awaiting resolution.".to_string(),
    }
}

fn git(root: &Path, args: &[&str]) {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("git runs");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Scratch git repository tagged with one release version
pub struct FixtureRepo {
    _dir: TempDir,
    pub repo: GitRepo,
}

impl FixtureRepo {
    /// Create a repository whose initial commit carries `tag`
    /// (e.g. `v18.2.0`).
    pub fn new(tag: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = dir.path();
        git(root, &["init", "-q", "-b", "main"]);
        git(root, &["config", "user.name", "Test Operator"]);
        git(root, &["config", "user.email", "operator@example.com"]);
        git(root, &["commit", "--allow-empty", "-q", "-m", "initial"]);
        git(root, &["tag", tag]);
        let repo = GitRepo::open(root).expect("open fixture repo");
        Self { _dir: dir, repo }
    }

    /// Add one merge commit with the given message, returning its hash.
    pub fn add_merge(&self, message: &str) -> String {
        let root = self.repo.root().to_path_buf();
        git(&root, &["checkout", "-q", "-b", "wip"]);
        git(&root, &["commit", "--allow-empty", "-q", "-m", "backport fix"]);
        git(&root, &["checkout", "-q", "main"]);
        git(&root, &["merge", "--no-ff", "-q", "-m", message, "wip"]);
        git(&root, &["branch", "-q", "-D", "wip"]);
        self.repo.head().expect("head after merge")
    }

    /// Hash of the commit a tag points at.
    pub fn tag_commit(&self, tag: &str) -> String {
        self.repo.tag_target(tag).expect("tag target")
    }
}
