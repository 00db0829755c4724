//! backport-resolve - reconcile backport merge commits with tracker issues
//!
//! Given merge commits on a release branch, determine for each backport
//! whether its tracker issue is cross-linked to the pull request, whether
//! its release metadata matches the branch, and whether it should be
//! resolved with the computed target version - then apply the updates,
//! interactively or in dry-run, resumably via a movable progress marker.

pub mod auth;
pub mod backport;
pub mod error;
pub mod host;
pub mod marker;
pub mod repo;
pub mod tracker;
pub mod types;
pub mod version;

pub use error::{Error, Result};
