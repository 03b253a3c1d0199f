use super::common::*;
use crate::engine::cohort::resolve_cohort;
use crate::engine::domain::CohortSource;

#[test]
fn manual_selection_skips_the_fallback_rule() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&["E4"], None, 5));

    assert_eq!(cohort.source, CohortSource::Explicit { manual: 1, role: 0 });
    assert_eq!(cohort.members.len(), 1);
    assert!(cohort.contains(&id("E4")));
}

#[test]
fn role_selection_keeps_only_qualifying_holders() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&[], Some(10), 5));

    assert_eq!(cohort.source, CohortSource::Explicit { manual: 0, role: 1 });
    assert!(cohort.contains(&id("E1")));
    assert!(
        !cohort.contains(&id("E2")),
        "E2's latest rating is below the bar"
    );
}

#[test]
fn manual_and_role_sets_are_unioned() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&["E4", "E3"], Some(20), 5));

    assert_eq!(cohort.source, CohortSource::Explicit { manual: 2, role: 1 });
    let members: Vec<_> = cohort.members.iter().map(|m| m.as_str()).collect();
    assert_eq!(members, vec!["E3", "E4"]);
}

#[test]
fn explicit_union_wins_even_when_smaller_than_fallback() {
    let snapshot = roster_snapshot();

    let fallback = resolve_cohort(&snapshot, &selection(&[], None, 5));
    let explicit = resolve_cohort(&snapshot, &selection(&[], Some(20), 5));

    assert!(explicit.len() < fallback.len());
    assert_eq!(explicit.source, CohortSource::Explicit { manual: 0, role: 1 });
}

#[test]
fn empty_selection_falls_back_to_organization_wide_rating() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&[], None, 5));

    assert_eq!(cohort.source, CohortSource::Fallback);
    let members: Vec<_> = cohort.members.iter().map(|m| m.as_str()).collect();
    assert_eq!(members, vec!["E1", "E3", "E5"]);
}

#[test]
fn role_without_qualifiers_falls_back() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&[], Some(99), 4));

    assert_eq!(cohort.source, CohortSource::Fallback);
    let members: Vec<_> = cohort.members.iter().map(|m| m.as_str()).collect();
    assert_eq!(members, vec!["E1", "E2", "E3", "E5"]);
}

#[test]
fn unreachable_rating_yields_empty_fallback() {
    let snapshot = roster_snapshot();

    let cohort = resolve_cohort(&snapshot, &selection(&[], None, 6));

    assert_eq!(cohort.source, CohortSource::Fallback);
    assert!(cohort.is_empty());
}
