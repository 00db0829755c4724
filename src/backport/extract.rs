//! Merge-line and tracker-URL extraction

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Matches the PR reference in a merge-commit description.
static PR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:pull request|pr)\s*#(\d+)").expect("valid regex"));

/// Parse one merge-log line into `(short_hash, pr_number)`.
///
/// The line has the `git log --oneline` shape `<shortHash> <description>`
/// and the description must reference a PR as `pull request #N` or
/// `PR #N`. Anything else is a [`Error::MalformedMergeCommit`], which the
/// batch loop treats as impossible to resolve rather than run-fatal.
pub fn parse_merge_line(line: &str) -> Result<(String, u64)> {
    let line = line.trim();
    let (short_hash, description) = line
        .split_once(' ')
        .ok_or_else(|| Error::MalformedMergeCommit(format!("no description in \"{line}\"")))?;
    if short_hash.is_empty() || !short_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::MalformedMergeCommit(format!(
            "\"{short_hash}\" is not a commit hash"
        )));
    }
    let captures = PR_REFERENCE.captures(description).ok_or_else(|| {
        Error::MalformedMergeCommit(format!("no pull request reference in \"{description}\""))
    })?;
    let number = captures[1]
        .parse()
        .map_err(|_| Error::MalformedMergeCommit(format!("bad PR number in \"{description}\"")))?;
    Ok((short_hash.to_string(), number))
}

/// Build the issue-URL pattern for a tracker host.
pub fn issue_url_pattern(tracker_host: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"https?://{}/issues/(\d+)",
        regex::escape(tracker_host)
    ))
    .map_err(|e| Error::Config(format!("bad tracker host {tracker_host}: {e}")))
}

/// Extract tracker issue ids from a PR body.
///
/// Repeated URLs are deduplicated; first-seen order is preserved.
#[must_use]
pub fn tracker_issue_ids(body: &str, pattern: &Regex) -> Vec<u64> {
    let mut seen = Vec::new();
    for captures in pattern.captures_iter(body) {
        if let Ok(id) = captures[1].parse::<u64>()
            && !seen.contains(&id)
        {
            seen.push(id);
        }
    }
    seen
}
