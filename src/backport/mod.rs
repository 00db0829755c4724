//! Backport reconciliation engine
//!
//! Three-phase shape per batch item:
//! 1. Gather - merge line, PR metadata, tracker issues (effectful, bounded)
//! 2. Validate - cross-link checks producing decision flags (pure)
//! 3. Apply - disposition, patch build, tracker update (effectful)

mod extract;
mod run;
mod update;
mod validate;

pub use extract::{issue_url_pattern, parse_merge_line, tracker_issue_ids};
pub use run::{
    BatchOutcome, BatchRequest, DispositionSource, ItemReport, ItemStatus, run_batch,
};
pub use update::{MIN_WRITE_DELAY, UpdateOptions, UpdateOutcome, apply_updates, build_patch};
pub use validate::{validate_tracker, validate_trackers};
