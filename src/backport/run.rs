//! Batch driver
//!
//! Walks merge commits one at a time: gather, validate, ask the operator,
//! apply, advance the marker. Strictly sequential; the only suspension
//! points are the disposition prompt, network calls, and the post-update
//! delay.

use crate::backport::extract::{issue_url_pattern, parse_merge_line, tracker_issue_ids};
use crate::backport::update::{UpdateOptions, apply_updates};
use crate::backport::validate::validate_trackers;
use crate::error::{Error, Result};
use crate::host::HostService;
use crate::marker::ProgressMarker;
use crate::repo::GitRepo;
use crate::tracker::{BACKPORT_TRACKER, CatalogCache, TrackerService};
use crate::types::{BackportAggregate, Disposition, MergeCommitRecord};
use crate::version::Version;
use regex::Regex;
use tracing::{debug, info, warn};

/// What to process and how
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Named release of the branch being reconciled
    pub release: String,
    /// Single-item mode: only merges referencing this PR, marker ignored
    pub single_pr: Option<u64>,
    /// Dry-run switch and post-write delay
    pub update_options: UpdateOptions,
}

/// Outcome of one batch item's gather/validate phase
#[derive(Debug)]
pub enum ItemStatus {
    /// Fully validated and ready for update
    Resolved(BackportAggregate),
    /// Could not be resolved; only abort/ignore dispositions apply
    Unresolvable(Error),
}

/// One batch item, presented to the disposition source
#[derive(Debug)]
pub struct ItemReport {
    /// The raw merge-log line
    pub line: String,
    /// Full commit hash, when the short hash resolved
    pub commit: Option<String>,
    /// Gather/validate outcome
    pub status: ItemStatus,
}

impl ItemReport {
    /// Whether the update disposition is on the menu for this item.
    #[must_use]
    pub const fn can_update(&self) -> bool {
        matches!(self.status, ItemStatus::Resolved(_))
    }
}

/// Where dispositions come from
///
/// The CLI implements this with an interactive prompt; tests inject
/// scripted decisions, and dry-run uses the per-item default.
pub trait DispositionSource {
    /// Decide what to do with one item. When `report.can_update()` is
    /// false only abort/ignore are valid; returning update is treated
    /// as ignore.
    fn choose(&mut self, report: &ItemReport) -> Result<Disposition>;
}

/// Tally of a completed (or aborted) batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Items examined
    pub processed: usize,
    /// Items whose trackers were updated (or would be, in dry-run)
    pub updated: usize,
    /// Items skipped by the operator or unresolvable
    pub ignored: usize,
    /// The operator aborted; exit non-zero, marker not advanced for the
    /// current item
    pub aborted: bool,
}

/// Run one reconciliation batch.
///
/// Marker-driven mode processes every merge commit between the progress
/// marker and HEAD, oldest first, advancing the marker after each
/// non-aborted item. Single-item mode processes only merges referencing
/// the requested PR and never touches the marker.
pub async fn run_batch(
    repo: &GitRepo,
    host: &dyn HostService,
    tracker: &dyn TrackerService,
    catalogs: &CatalogCache,
    dispositions: &mut dyn DispositionSource,
    request: &BatchRequest,
) -> Result<BatchOutcome> {
    let pattern = issue_url_pattern(tracker.host())?;
    let marker = ProgressMarker::for_release(&request.release);

    let lines = match request.single_pr {
        Some(pr) => {
            let all = repo.merge_log(None)?;
            let matching: Vec<String> = all
                .into_iter()
                .filter(|line| matches!(parse_merge_line(line), Ok((_, n)) if n == pr))
                .collect();
            info!(pr, count = matching.len(), "single-item mode");
            matching
        }
        None => {
            marker.ensure_exists(repo, &request.release)?;
            let range = format!("{}..HEAD", marker.name());
            let lines = repo.merge_log(Some(&range))?;
            info!(marker = marker.name(), count = lines.len(), "marker-driven mode");
            lines
        }
    };

    let marker_driven = request.single_pr.is_none();
    let mut outcome = BatchOutcome::default();

    for line in lines {
        let report = gather_item(repo, host, tracker, catalogs, &pattern, request, &line).await?;
        outcome.processed += 1;

        let disposition = dispositions.choose(&report)?;
        debug!(line = %report.line, %disposition, "operator disposition");

        match disposition {
            Disposition::Abort => {
                warn!(line = %report.line, "batch aborted by operator");
                outcome.aborted = true;
                return Ok(outcome);
            }
            Disposition::Update if report.can_update() => {
                let ItemStatus::Resolved(ref aggregate) = report.status else {
                    unreachable!("can_update checked");
                };
                let pr_url = host.pr_url(aggregate.pr.number);
                let updated = apply_updates(
                    aggregate,
                    tracker,
                    catalogs,
                    &pr_url,
                    &request.update_options,
                )
                .await?;
                info!(
                    pr = aggregate.pr.number,
                    updated = updated.updated.len(),
                    skipped = updated.skipped.len(),
                    "item updated"
                );
                outcome.updated += 1;
            }
            Disposition::Ignore | Disposition::Update => {
                info!(line = %report.line, "item ignored");
                outcome.ignored += 1;
            }
        }

        if marker_driven {
            match report.commit {
                Some(ref commit) => marker.advance(repo, commit)?,
                // An unresolvable short hash leaves the marker in place;
                // the next run re-encounters the item.
                None => warn!(line = %report.line, "cannot advance marker past unresolved commit"),
            }
        }
    }

    Ok(outcome)
}

/// Gather and validate one merge-log line into an [`ItemReport`].
///
/// Item-recoverable faults become [`ItemStatus::Unresolvable`]; run-level
/// faults propagate.
async fn gather_item(
    repo: &GitRepo,
    host: &dyn HostService,
    tracker: &dyn TrackerService,
    catalogs: &CatalogCache,
    pattern: &Regex,
    request: &BatchRequest,
    line: &str,
) -> Result<ItemReport> {
    // Best-effort commit resolution up front so the marker can advance
    // past items that later fail validation.
    let commit = line
        .split_whitespace()
        .next()
        .and_then(|short| repo.resolve_commit(short).ok());

    match resolve_item(repo, host, tracker, catalogs, pattern, request, line).await {
        Ok(aggregate) => Ok(ItemReport {
            line: line.to_string(),
            commit,
            status: ItemStatus::Resolved(aggregate),
        }),
        Err(err) if err.is_item_recoverable() => {
            warn!(line, %err, "item cannot be resolved");
            Ok(ItemReport {
                line: line.to_string(),
                commit,
                status: ItemStatus::Unresolvable(err),
            })
        }
        Err(err) => Err(err),
    }
}

async fn resolve_item(
    repo: &GitRepo,
    host: &dyn HostService,
    tracker: &dyn TrackerService,
    catalogs: &CatalogCache,
    pattern: &Regex,
    request: &BatchRequest,
    line: &str,
) -> Result<BackportAggregate> {
    let (short_hash, pr_number) = parse_merge_line(line)?;
    let full_hash = repo.resolve_commit(&short_hash)?;

    let base_version = Version::from_describe(&repo.describe(&full_hash)?)?;
    let release = base_version.release()?;
    if release != request.release {
        return Err(Error::Git(format!(
            "merge {short_hash} describes to release \"{release}\", batch is for \"{}\"",
            request.release
        )));
    }
    let target_version = base_version.resolve_target()?;
    // The catalogs are assumed complete: a target the tracker does not
    // know is fatal to the run, not to the item.
    catalogs.version_id(&target_version)?;

    let pr = host.fetch_pr(pr_number).await?;

    let ids = tracker_issue_ids(&pr.body, pattern);
    if ids.is_empty() {
        return Err(Error::NoBackportTrackerFound(pr_number));
    }

    // Type filtering goes through the catalog: an issue whose tracker
    // type the catalog does not list is a protocol violation.
    let backport_type = catalogs.tracker_type_id(BACKPORT_TRACKER)?;
    let mut backport_issues = Vec::new();
    for id in ids {
        let issue = tracker.fetch_issue(id).await?;
        if catalogs.tracker_type_id(&issue.tracker_type)? == backport_type {
            backport_issues.push(issue);
        } else {
            debug!(
                issue = id,
                tracker_type = %issue.tracker_type,
                "skipping non-backport tracker reference"
            );
        }
    }
    if backport_issues.is_empty() {
        return Err(Error::NoBackportTrackerFound(pr_number));
    }

    let pr_url = host.pr_url(pr_number);
    let trackers = validate_trackers(backport_issues, &pr_url, release, target_version)?;

    Ok(BackportAggregate {
        merge: MergeCommitRecord {
            short_hash,
            full_hash,
            summary: line.to_string(),
        },
        pr,
        base_version,
        target_version,
        release: release.to_string(),
        trackers,
    })
}
