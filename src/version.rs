//! Release versions and the backport target-version rule
//!
//! Versions come out of `git describe` against `v*` tags and out of the
//! tracker's version catalog. Both use the `vMAJOR.MINOR.PATCH` shape.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Known releases, keyed by `major.minor` prefix.
///
/// A development `x.0` and release-candidate `x.1` series belong to the
/// same named release as the stable `x.2` series.
const RELEASES: &[(&str, &str)] = &[
    ("16.0", "pacific"),
    ("16.1", "pacific"),
    ("16.2", "pacific"),
    ("17.0", "quincy"),
    ("17.1", "quincy"),
    ("17.2", "quincy"),
    ("18.0", "reef"),
    ("18.1", "reef"),
    ("18.2", "reef"),
    ("19.0", "squid"),
    ("19.1", "squid"),
    ("19.2", "squid"),
];

/// A `major.minor.patch` release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component
    pub patch: u32,
}

impl Version {
    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The named release this version belongs to.
    pub fn release(&self) -> Result<&'static str> {
        let prefix = format!("{}.{}", self.major, self.minor);
        RELEASES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, name)| *name)
            .ok_or_else(|| Error::UnknownRelease(self.to_string()))
    }

    /// The version a backport of this base should be resolved against.
    ///
    /// A `x.0.z` base means the backport lands in the first stable series
    /// and targets `x.1.z`; otherwise the next point release `x.y.z+1`.
    #[must_use]
    pub const fn next_target(&self) -> Self {
        if self.minor == 0 {
            Self::new(self.major, 1, self.patch)
        } else {
            Self::new(self.major, self.minor, self.patch + 1)
        }
    }

    /// Compute and sanity-check the backport target for this base version.
    ///
    /// The target must belong to the same named release as the base; a
    /// patch increment that crosses a minor boundary into a different
    /// release is rejected rather than silently accepted.
    pub fn resolve_target(&self) -> Result<Self> {
        let base_release = self.release()?;
        let target = self.next_target();
        let target_release = target.release()?;
        if target_release != base_release {
            return Err(Error::UnresolvedVersion(target.to_string()));
        }
        Ok(target)
    }

    /// Parse a version out of `git describe` output.
    ///
    /// Describe output looks like `v18.1.2-37-g1b2c3d4` when the commit is
    /// past the tag; everything after the tag name is dropped.
    pub fn from_describe(describe: &str) -> Result<Self> {
        let tag = describe.trim().split('-').next().unwrap_or_default();
        tag.parse()
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let body = s.trim().strip_prefix('v').unwrap_or_else(|| s.trim());
        let mut parts = body.splitn(3, '.');
        let parse = |part: Option<&str>| -> Result<u32> {
            part.and_then(|p| p.parse().ok())
                .ok_or_else(|| Error::UnknownRelease(s.to_string()))
        };
        Ok(Self {
            major: parse(parts.next())?,
            minor: parse(parts.next())?,
            patch: parse(parts.next())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}
