//! Code-hosting services
//!
//! Provides the read-only PR metadata interface the engine needs,
//! abstracted behind a trait so tests can run against a mock host.

mod github;

pub use github::GitHubHost;

use crate::error::Result;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Code-host service trait for pull-request reads
#[async_trait]
pub trait HostService: Send + Sync {
    /// Fetch title, body, and merged status for a pull request.
    ///
    /// The returned body has hidden comment blocks stripped. Fails with
    /// `ApiProtocol` if the response carries neither title nor body, and
    /// with `UnmergedPullRequest` if the PR is not merged.
    async fn fetch_pr(&self, number: u64) -> Result<PullRequest>;

    /// Web URL for a pull request on this host.
    fn pr_url(&self, number: u64) -> String;
}

/// Markers delimiting hidden template scaffolding in PR bodies.
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Strip `<!-- ... -->` blocks from a PR body.
///
/// These blocks are PR-template scaffolding, not content; tracker URLs
/// inside them must not be treated as references. An unterminated open
/// marker swallows the rest of the text.
#[must_use]
pub fn strip_hidden_comments(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(open) = rest.find(COMMENT_OPEN) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + COMMENT_OPEN.len()..];
        match after_open.find(COMMENT_CLOSE) {
            Some(close) => rest = &after_open[close + COMMENT_CLOSE.len()..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_block() {
        let body = "before <!-- hidden --> after";
        assert_eq!(strip_hidden_comments(body), "before  after");
    }

    #[test]
    fn strips_multiple_blocks() {
        let body = "a<!-- x -->b<!-- y -->c";
        assert_eq!(strip_hidden_comments(body), "abc");
    }

    #[test]
    fn strips_multiline_block() {
        let body = "keep\n<!--\ntracker template: https://tracker.ceph.com/issues/0\n-->\nkeep";
        assert_eq!(strip_hidden_comments(body), "keep\n\nkeep");
    }

    #[test]
    fn unterminated_block_swallows_tail() {
        let body = "keep <!-- never closed";
        assert_eq!(strip_hidden_comments(body), "keep ");
    }

    #[test]
    fn no_blocks_is_identity() {
        let body = "plain text with https://tracker.ceph.com/issues/4242";
        assert_eq!(strip_hidden_comments(body), body);
    }
}
