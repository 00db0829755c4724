//! Resolver/updater - patch building (pure) and application (effectful)

use crate::error::Result;
use crate::tracker::{CatalogCache, TrackerService};
use crate::types::{BackportAggregate, TrackerPatch, TrackerRef};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

/// Floor on the post-write delay for real updates. Writes faster than
/// this trip the tracker's abuse protection.
pub const MIN_WRITE_DELAY: Duration = Duration::from_secs(3);

/// Options controlling update application
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Compute patches but never send them, and skip the delay
    pub dry_run: bool,
    /// Delay observed after every real write
    pub delay: Duration,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            delay: Duration::from_secs(5),
        }
    }
}

impl UpdateOptions {
    fn effective_delay(&self) -> Duration {
        self.delay.max(MIN_WRITE_DELAY)
    }
}

/// Result of applying updates for one batch item
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    /// Issues a patch was computed for (sent unless dry-run)
    pub updated: Vec<u64>,
    /// Issues that were already fully consistent
    pub skipped: Vec<u64>,
}

/// Build the field patch for one validated tracker (PURE).
///
/// Returns `None` when the tracker is already fully consistent; an
/// already-resolved tracker is a no-op, which is what makes a rescan
/// after losing the progress marker safe. The audit note rides along
/// with any real change.
pub fn build_patch(
    aggregate: &BackportAggregate,
    tracker: &TrackerRef,
    catalogs: &CatalogCache,
    pr_url: &str,
) -> Result<Option<TrackerPatch>> {
    if !tracker.needs_update() {
        return Ok(None);
    }

    let status_id = if tracker.needs_status_update {
        Some(catalogs.status_id(crate::tracker::RESOLVED_STATUS)?)
    } else {
        None
    };
    let fixed_version_id = if tracker.needs_target_version_update {
        Some(catalogs.version_id(&aggregate.target_version)?)
    } else {
        None
    };
    let description = tracker
        .needs_backlink
        .then(|| format!("{pr_url}\n\n{}", tracker.issue.description));

    let notes = format!(
        "Backport landed in {} ({}) via {}; resolved against {} on {}.",
        aggregate.target_version,
        aggregate.release,
        pr_url,
        aggregate.merge.full_hash,
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
    );

    Ok(Some(TrackerPatch {
        issue_id: tracker.issue.id,
        status_id,
        fixed_version_id,
        description,
        notes,
    }))
}

/// Apply the decided updates for every tracker in the item (EFFECTFUL).
///
/// One update call per tracker, each followed by the configured delay.
/// Dry-run computes every patch but issues no writes and sleeps for
/// nothing.
pub async fn apply_updates(
    aggregate: &BackportAggregate,
    tracker: &dyn TrackerService,
    catalogs: &CatalogCache,
    pr_url: &str,
    options: &UpdateOptions,
) -> Result<UpdateOutcome> {
    let mut outcome = UpdateOutcome::default();

    for tracker_ref in &aggregate.trackers {
        let Some(patch) = build_patch(aggregate, tracker_ref, catalogs, pr_url)? else {
            debug!(issue = tracker_ref.issue.id, "tracker already consistent");
            outcome.skipped.push(tracker_ref.issue.id);
            continue;
        };

        if options.dry_run {
            info!(
                issue = patch.issue_id,
                status_id = ?patch.status_id,
                fixed_version_id = ?patch.fixed_version_id,
                "dry run: would update tracker issue"
            );
            outcome.updated.push(patch.issue_id);
            continue;
        }

        tracker.update_issue(&patch).await?;
        info!(issue = patch.issue_id, "updated tracker issue");
        outcome.updated.push(patch.issue_id);
        tokio::time::sleep(options.effective_delay()).await;
    }

    Ok(outcome)
}
