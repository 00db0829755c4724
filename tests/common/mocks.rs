//! Mock host, tracker, and disposition services for testing
//!
//! Hand-written mocks in the same spirit as the production traits:
//! response maps, call tracking, and error injection.

#![allow(dead_code)]

use async_trait::async_trait;
use backport_resolve::backport::{DispositionSource, ItemReport, ItemStatus};
use backport_resolve::error::{Error, Result};
use backport_resolve::host::HostService;
use backport_resolve::tracker::{CatalogEntry, TrackerService};
use backport_resolve::types::{Disposition, PullRequest, TrackerIssue, TrackerPatch};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock code host with a fixed PR response map
pub struct MockHost {
    prs: Mutex<HashMap<u64, PullRequest>>,
    fetch_calls: Mutex<Vec<u64>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            prs: Mutex::new(HashMap::new()),
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a PR response.
    pub fn set_pr(&self, pr: PullRequest) {
        self.prs.lock().unwrap().insert(pr.number, pr);
    }

    pub fn fetch_calls(&self) -> Vec<u64> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostService for MockHost {
    async fn fetch_pr(&self, number: u64) -> Result<PullRequest> {
        self.fetch_calls.lock().unwrap().push(number);
        let pr = self
            .prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| {
                Error::GitHubApi(format!("fetch_pr: no response configured for PR #{number}"))
            })?;
        // Mirror the real fetcher's contract: unmerged PRs are an error.
        if !pr.merged {
            return Err(Error::UnmergedPullRequest(number));
        }
        Ok(pr)
    }

    fn pr_url(&self, number: u64) -> String {
        format!("https://github.com/ceph/ceph/pull/{number}")
    }
}

/// Mock tracker with issue and catalog response maps
pub struct MockTracker {
    issues: Mutex<HashMap<u64, TrackerIssue>>,
    statuses: Vec<CatalogEntry>,
    tracker_types: Vec<CatalogEntry>,
    versions: Vec<CatalogEntry>,
    update_calls: Mutex<Vec<TrackerPatch>>,
    fetch_calls: Mutex<Vec<u64>>,
    error_on_update: Mutex<Option<String>>,
}

impl MockTracker {
    /// Mock with the standard catalog fixtures (statuses New/In
    /// Progress/Resolved, tracker types Bug/Backport, a few versions).
    pub fn new() -> Self {
        let entry = |id, name: &str| CatalogEntry {
            id,
            name: name.to_string(),
        };
        Self {
            issues: Mutex::new(HashMap::new()),
            statuses: vec![
                entry(1, "New"),
                entry(2, "In Progress"),
                entry(3, "Resolved"),
            ],
            tracker_types: vec![entry(1, "Bug"), entry(9, "Backport")],
            versions: vec![
                entry(101, "v17.2.6"),
                entry(102, "v18.1.3"),
                entry(103, "v18.2.1"),
            ],
            update_calls: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(Vec::new()),
            error_on_update: Mutex::new(None),
        }
    }

    /// Mock with an explicit version catalog.
    pub fn with_versions(versions: Vec<CatalogEntry>) -> Self {
        Self {
            versions,
            ..Self::new()
        }
    }

    pub fn set_issue(&self, issue: TrackerIssue) {
        self.issues.lock().unwrap().insert(issue.id, issue);
    }

    /// Make `update_issue` return an error.
    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    pub fn update_calls(&self) -> Vec<TrackerPatch> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> Vec<u64> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackerService for MockTracker {
    async fn fetch_issue(&self, id: u64) -> Result<TrackerIssue> {
        self.fetch_calls.lock().unwrap().push(id);
        self.issues
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                Error::Tracker(format!("fetch_issue: no response configured for issue {id}"))
            })
    }

    async fn update_issue(&self, patch: &TrackerPatch) -> Result<()> {
        self.update_calls.lock().unwrap().push(patch.clone());
        if let Some(msg) = self.error_on_update.lock().unwrap().as_ref() {
            return Err(Error::Tracker(msg.clone()));
        }
        Ok(())
    }

    async fn list_statuses(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.statuses.clone())
    }

    async fn list_tracker_types(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.tracker_types.clone())
    }

    async fn list_versions(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.versions.clone())
    }

    fn host(&self) -> &str {
        "tracker.ceph.com"
    }

    fn issue_url(&self, id: u64) -> String {
        format!("https://tracker.ceph.com/issues/{id}")
    }
}

/// What the scripted disposition source saw for one item
#[derive(Debug, Clone)]
pub struct SeenItem {
    pub line: String,
    pub can_update: bool,
    /// `(issue id, needs_status, needs_target_version, needs_backlink)`
    pub tracker_flags: Vec<(u64, bool, bool, bool)>,
    pub target_version: Option<String>,
}

/// Disposition source replaying a fixed script, recording what it saw
pub struct ScriptedDispositions {
    script: Vec<Disposition>,
    next: usize,
    pub seen: Vec<SeenItem>,
}

impl ScriptedDispositions {
    pub fn new(script: Vec<Disposition>) -> Self {
        Self {
            script,
            next: 0,
            seen: Vec::new(),
        }
    }
}

impl DispositionSource for ScriptedDispositions {
    fn choose(&mut self, report: &ItemReport) -> Result<Disposition> {
        let (tracker_flags, target_version) = match &report.status {
            ItemStatus::Resolved(aggregate) => (
                aggregate
                    .trackers
                    .iter()
                    .map(|t| {
                        (
                            t.issue.id,
                            t.needs_status_update,
                            t.needs_target_version_update,
                            t.needs_backlink,
                        )
                    })
                    .collect(),
                Some(aggregate.target_version.to_string()),
            ),
            ItemStatus::Unresolvable(_) => (Vec::new(), None),
        };
        self.seen.push(SeenItem {
            line: report.line.clone(),
            can_update: report.can_update(),
            tracker_flags,
            target_version,
        });

        let disposition = self
            .script
            .get(self.next)
            .copied()
            .unwrap_or(Disposition::Ignore);
        self.next += 1;
        Ok(disposition)
    }
}
