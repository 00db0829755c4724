//! Run-scoped catalog cache
//!
//! The tracker's status, tracker-type, and version catalogs are fetched
//! once at run start and read from memory for the rest of the run. The
//! cache is an explicit object passed by reference, never global state.

use crate::error::{Error, Result};
use crate::tracker::{CatalogEntry, TrackerService};
use crate::version::Version;
use tracing::debug;

/// Status name an updated backport tracker is moved to.
pub const RESOLVED_STATUS: &str = "Resolved";

/// Tracker-type name identifying backport issues.
pub const BACKPORT_TRACKER: &str = "Backport";

/// In-memory snapshot of the tracker's catalogs for one run
#[derive(Debug, Clone)]
pub struct CatalogCache {
    statuses: Vec<CatalogEntry>,
    tracker_types: Vec<CatalogEntry>,
    versions: Vec<CatalogEntry>,
}

impl CatalogCache {
    /// Fetch all three catalogs from the tracker.
    pub async fn load(tracker: &dyn TrackerService) -> Result<Self> {
        let statuses = tracker.list_statuses().await?;
        let tracker_types = tracker.list_tracker_types().await?;
        let versions = tracker.list_versions().await?;
        debug!(
            statuses = statuses.len(),
            tracker_types = tracker_types.len(),
            versions = versions.len(),
            "loaded tracker catalogs"
        );
        Ok(Self {
            statuses,
            tracker_types,
            versions,
        })
    }

    /// Build a cache from fixture catalogs (tests).
    #[must_use]
    pub const fn from_entries(
        statuses: Vec<CatalogEntry>,
        tracker_types: Vec<CatalogEntry>,
        versions: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            statuses,
            tracker_types,
            versions,
        }
    }

    fn find(entries: &[CatalogEntry], name: &str) -> Option<u64> {
        entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// Id of a status by name. The catalogs are assumed complete, so a
    /// miss is a run-fatal protocol error.
    pub fn status_id(&self, name: &str) -> Result<u64> {
        Self::find(&self.statuses, name)
            .ok_or_else(|| Error::ApiProtocol(format!("tracker has no \"{name}\" status")))
    }

    /// Id of a tracker type by name.
    pub fn tracker_type_id(&self, name: &str) -> Result<u64> {
        Self::find(&self.tracker_types, name)
            .ok_or_else(|| Error::ApiProtocol(format!("tracker has no \"{name}\" tracker type")))
    }

    /// Id of a version by its display form (e.g. `v18.1.3`).
    ///
    /// A computed target version that the tracker does not know cannot be
    /// resolved against, which is fatal to the run.
    pub fn version_id(&self, version: &Version) -> Result<u64> {
        Self::find(&self.versions, &version.to_string())
            .ok_or_else(|| Error::UnresolvedVersion(version.to_string()))
    }
}
