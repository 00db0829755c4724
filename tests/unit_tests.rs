//! Unit tests for backport-resolve modules

mod common;

mod target_version_test {
    use backport_resolve::version::Version;

    #[test]
    fn dev_base_targets_first_stable_series() {
        // v17.0.3 is a development base; the backport lands in 17.1
        let base: Version = "v17.0.3".parse().unwrap();
        assert_eq!(base.resolve_target().unwrap().to_string(), "v17.1.3");
    }

    #[test]
    fn stable_base_targets_next_point_release() {
        let base: Version = "v17.2.5".parse().unwrap();
        assert_eq!(base.resolve_target().unwrap().to_string(), "v17.2.6");
    }

    #[test]
    fn target_computation_is_deterministic() {
        let base: Version = "v18.1.2".parse().unwrap();
        let first = base.resolve_target().unwrap();
        let second = base.resolve_target().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Version::new(18, 1, 3));
    }
}

mod patch_test {
    use crate::common::{merged_pr, pending_backport_issue};
    use backport_resolve::backport::{build_patch, validate_tracker};
    use backport_resolve::tracker::{CatalogCache, CatalogEntry};
    use backport_resolve::types::{BackportAggregate, MergeCommitRecord, TrackerRef};
    use backport_resolve::version::Version;

    const PR_URL: &str = "https://github.com/ceph/ceph/pull/57891";

    fn catalogs() -> CatalogCache {
        let entry = |id, name: &str| CatalogEntry {
            id,
            name: name.to_string(),
        };
        CatalogCache::from_entries(
            vec![entry(2, "In Progress"), entry(3, "Resolved")],
            vec![entry(9, "Backport")],
            vec![entry(102, "v18.1.3")],
        )
    }

    fn aggregate(trackers: Vec<TrackerRef>) -> BackportAggregate {
        BackportAggregate {
            merge: MergeCommitRecord {
                short_hash: "1b2c3d4".to_string(),
                full_hash: "1b2c3d4e5f60718293a4b5c6d7e8f90011223344".to_string(),
                summary: "1b2c3d4 Merge pull request #57891 from ceph/wip".to_string(),
            },
            pr: merged_pr(57891, &[4242]),
            base_version: Version::new(18, 1, 2),
            target_version: Version::new(18, 1, 3),
            release: "reef".to_string(),
            trackers,
        }
    }

    #[test]
    fn pending_tracker_gets_full_patch() {
        let tracker =
            validate_tracker(pending_backport_issue(4242, "reef"), PR_URL, "reef", Version::new(18, 1, 3))
                .unwrap();
        let agg = aggregate(vec![tracker.clone()]);
        let patch = build_patch(&agg, &tracker, &catalogs(), PR_URL)
            .unwrap()
            .expect("patch for pending tracker");

        assert_eq!(patch.issue_id, 4242);
        assert_eq!(patch.status_id, Some(3));
        assert_eq!(patch.fixed_version_id, Some(102));
        // Back-link prepended, original text retained
        let description = patch.description.expect("back-link description");
        assert!(description.starts_with(PR_URL));
        assert!(description.contains("Backport awaiting resolution."));
        // Audit note always records the source PR and merge commit
        assert!(patch.notes.contains(PR_URL));
        assert!(patch.notes.contains(&agg.merge.full_hash));
        assert!(patch.notes.contains("v18.1.3"));
    }

    #[test]
    fn consistent_tracker_produces_no_patch() {
        let mut issue = pending_backport_issue(4242, "reef");
        issue.status = "Resolved".to_string();
        issue.target_version = Some("v18.1.3".to_string());
        issue.description = format!("Backport of {PR_URL}");
        let tracker =
            validate_tracker(issue, PR_URL, "reef", Version::new(18, 1, 3)).unwrap();
        assert!(!tracker.needs_update());

        let agg = aggregate(vec![tracker.clone()]);
        assert!(build_patch(&agg, &tracker, &catalogs(), PR_URL).unwrap().is_none());
    }

    #[test]
    fn partial_patch_touches_only_flagged_fields() {
        // Status and back-link correct, only the target version missing
        let mut issue = pending_backport_issue(4242, "reef");
        issue.status = "Resolved".to_string();
        issue.description = format!("Backport of {PR_URL}");
        let tracker =
            validate_tracker(issue, PR_URL, "reef", Version::new(18, 1, 3)).unwrap();
        let agg = aggregate(vec![tracker.clone()]);
        let patch = build_patch(&agg, &tracker, &catalogs(), PR_URL)
            .unwrap()
            .expect("patch");

        assert_eq!(patch.status_id, None);
        assert_eq!(patch.fixed_version_id, Some(102));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn unknown_target_version_is_run_fatal() {
        let tracker =
            validate_tracker(pending_backport_issue(4242, "reef"), PR_URL, "reef", Version::new(18, 1, 3))
                .unwrap();
        let mut agg = aggregate(vec![tracker.clone()]);
        agg.target_version = Version::new(18, 1, 9);
        let err = build_patch(&agg, &tracker, &catalogs(), PR_URL).unwrap_err();
        assert!(matches!(
            err,
            backport_resolve::Error::UnresolvedVersion(_)
        ));
    }

    #[test]
    fn patch_serializes_without_untouched_fields() {
        // The tracker update payload must not carry nulls for fields the
        // patch does not change.
        let mut issue = pending_backport_issue(4242, "reef");
        issue.status = "Resolved".to_string();
        issue.description = format!("Backport of {PR_URL}");
        let tracker =
            validate_tracker(issue, PR_URL, "reef", Version::new(18, 1, 3)).unwrap();
        let agg = aggregate(vec![tracker.clone()]);
        let patch = build_patch(&agg, &tracker, &catalogs(), PR_URL)
            .unwrap()
            .expect("patch");

        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("status_id").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["fixed_version_id"], 102);
        assert!(json["notes"].is_string());
    }
}

mod extraction_test {
    use backport_resolve::backport::{issue_url_pattern, tracker_issue_ids};

    #[test]
    fn repeated_and_distinct_urls_yield_two_refs_in_order() {
        // Same URL twice plus one other URL: exactly two refs, first-seen order
        let pattern = issue_url_pattern("tracker.ceph.com").unwrap();
        let body = "https://tracker.ceph.com/issues/4242\n\
                    more text https://tracker.ceph.com/issues/4242\n\
                    and https://tracker.ceph.com/issues/555";
        assert_eq!(tracker_issue_ids(body, &pattern), vec![4242, 555]);
    }
}
