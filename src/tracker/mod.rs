//! Issue-tracker services
//!
//! Issue reads and updates plus the catalog listings (statuses, tracker
//! types, versions), behind a trait so the engine is testable with
//! fixture catalogs and a mock tracker.

mod catalog;
mod redmine;

pub use catalog::{BACKPORT_TRACKER, CatalogCache, RESOLVED_STATUS};
pub use redmine::RedmineTracker;

use crate::error::Result;
use crate::types::{TrackerIssue, TrackerPatch};
use async_trait::async_trait;
use serde::Deserialize;

/// An id/name pair from one of the tracker's catalog endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    /// Catalog id, referenced in update payloads
    pub id: u64,
    /// Human-readable name ("Resolved", "Backport", "v18.1.3", ...)
    pub name: String,
}

/// Issue-tracker service trait
#[async_trait]
pub trait TrackerService: Send + Sync {
    /// Fetch one issue with its custom fields.
    async fn fetch_issue(&self, id: u64) -> Result<TrackerIssue>;

    /// Apply a field patch to one issue.
    async fn update_issue(&self, patch: &TrackerPatch) -> Result<()>;

    /// List all issue statuses.
    async fn list_statuses(&self) -> Result<Vec<CatalogEntry>>;

    /// List all tracker types.
    async fn list_tracker_types(&self) -> Result<Vec<CatalogEntry>>;

    /// List all versions of the project under reconciliation.
    async fn list_versions(&self) -> Result<Vec<CatalogEntry>>;

    /// Hostname of the tracker (used to recognize issue URLs).
    fn host(&self) -> &str;

    /// Web URL for an issue on this tracker.
    fn issue_url(&self, id: u64) -> String;
}
