//! Version-control queries
//!
//! The engine needs a handful of read queries (resolve a short hash,
//! describe the nearest release tag, list merge commits in a range) plus
//! tag create/delete for the progress marker. All of it is git plumbing,
//! driven through the `git` binary.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Handle to a local git repository
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let out = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()?;
        if !out.status.success() {
            return Err(Error::Git(format!(
                "not a git repository: {}",
                path.display()
            )));
        }
        let root = PathBuf::from(String::from_utf8_lossy(&out.stdout).trim());
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root })
    }

    /// Repository root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let out = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?;
        if !out.status.success() {
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
    }

    /// Resolve a short hash to exactly one full commit hash.
    ///
    /// An ambiguous or unknown abbreviation is a
    /// [`Error::MalformedMergeCommit`]: the caller treats the item as
    /// impossible to resolve rather than failing the run.
    pub fn resolve_commit(&self, short_hash: &str) -> Result<String> {
        let spec = format!("{short_hash}^{{commit}}");
        self.git(&["rev-parse", "--verify", "--quiet", &spec])
            .map_err(|e| {
                Error::MalformedMergeCommit(format!(
                    "short hash {short_hash} does not resolve to one commit: {e}"
                ))
            })
    }

    /// Full hash of the current HEAD.
    pub fn head(&self) -> Result<String> {
        self.git(&["rev-parse", "HEAD"])
    }

    /// Nearest `v*` release tag reachable from `commit`, in
    /// `git describe` form (`v18.1.2-37-g1b2c3d4`).
    pub fn describe(&self, commit: &str) -> Result<String> {
        self.git(&["describe", "--tags", "--match", "v*", commit])
    }

    /// Merge commits on the first-parent chain, oldest first, one line
    /// per commit (`<shortHash> <description>`).
    ///
    /// `range` is a revision range like `marker..HEAD`; `None` scans the
    /// whole history of HEAD.
    pub fn merge_log(&self, range: Option<&str>) -> Result<Vec<String>> {
        let rev = range.unwrap_or("HEAD");
        let out = self.git(&[
            "log",
            "--oneline",
            "--no-decorate",
            "--merges",
            "--first-parent",
            "--reverse",
            rev,
        ])?;
        Ok(out
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Whether a tag with this name exists.
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        let spec = format!("refs/tags/{name}");
        match self.git(&["show-ref", "--verify", "--quiet", &spec]) {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    /// Full hash of the commit a tag points at.
    pub fn tag_target(&self, name: &str) -> Result<String> {
        let spec = format!("refs/tags/{name}^{{commit}}");
        self.git(&["rev-parse", "--verify", &spec])
    }

    /// Create a lightweight tag at `commit`.
    pub fn create_tag(&self, name: &str, commit: &str) -> Result<()> {
        self.git(&["tag", name, commit])?;
        debug!(name, commit, "created tag");
        Ok(())
    }

    /// Delete a tag.
    pub fn delete_tag(&self, name: &str) -> Result<()> {
        self.git(&["tag", "-d", name])?;
        debug!(name, "deleted tag");
        Ok(())
    }
}
