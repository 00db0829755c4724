//! Cross-link validation - pure functions over fetched data
//!
//! No I/O happens here; the batch driver fetches issues and passes them
//! in, so the consistency rules are unit-testable with fixtures.

use crate::error::{Error, Result};
use crate::tracker::RESOLVED_STATUS;
use crate::types::{TrackerIssue, TrackerRef};
use crate::version::Version;

/// Whether `description` links back to the given PR.
///
/// Matches the full PR URL and requires the number not to continue with
/// more digits, so a back-link to PR 123 is not satisfied by PR 1234.
fn mentions_pr(description: &str, pr_url: &str) -> bool {
    let mut rest = description;
    while let Some(pos) = rest.find(pr_url) {
        let tail = &rest[pos + pr_url.len()..];
        if !tail.starts_with(|c: char| c.is_ascii_digit()) {
            return true;
        }
        rest = tail;
    }
    false
}

/// Validate one tracker issue against the branch and PR context.
///
/// Returns the issue wrapped with its decision flags, or an error when
/// the two systems disagree in a way the engine must not self-heal:
///
/// - a release-field mismatch means the backport landed on the wrong
///   branch ([`Error::ReleaseMismatch`]);
/// - a set target version that differs from the computed one means two
///   sources of truth conflict ([`Error::TargetVersionConflict`]).
///
/// A missing back-link or unset target version is only flagged; the
/// updater self-heals those.
pub fn validate_tracker(
    issue: TrackerIssue,
    pr_url: &str,
    release: &str,
    target: Version,
) -> Result<TrackerRef> {
    let actual_release = issue.release_field.clone().unwrap_or_else(|| "unset".to_string());
    if actual_release != release {
        return Err(Error::ReleaseMismatch {
            issue: issue.id,
            expected: release.to_string(),
            actual: actual_release,
        });
    }

    let needs_target_version_update = match issue.target_version.as_deref() {
        None => true,
        Some(set) => {
            let set_version: Version = set.parse().map_err(|_| Error::TargetVersionConflict {
                issue: issue.id,
                expected: target.to_string(),
                actual: set.to_string(),
            })?;
            if set_version != target {
                return Err(Error::TargetVersionConflict {
                    issue: issue.id,
                    expected: target.to_string(),
                    actual: set.to_string(),
                });
            }
            false
        }
    };

    let needs_backlink = !mentions_pr(&issue.description, pr_url);
    let needs_status_update = issue.status != RESOLVED_STATUS;

    Ok(TrackerRef {
        issue,
        needs_status_update,
        needs_target_version_update,
        needs_backlink,
    })
}

/// Validate every candidate tracker for one backport item.
///
/// Fails on the first inconsistent tracker; the batch loop downgrades the
/// item and surfaces the error to the operator.
pub fn validate_trackers(
    issues: Vec<TrackerIssue>,
    pr_url: &str,
    release: &str,
    target: Version,
) -> Result<Vec<TrackerRef>> {
    issues
        .into_iter()
        .map(|issue| validate_tracker(issue, pr_url, release, target))
        .collect()
}
