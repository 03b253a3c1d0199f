use std::collections::{BTreeMap, BTreeSet};

use super::domain::{Cohort, CohortSelection, CohortSource, EmployeeId, TalentSnapshot};

/// Resolve the benchmark cohort for a selection.
///
/// Manual picks and qualifying role holders are unioned; only when both are
/// empty does the organization-wide rating rule apply.
pub(crate) fn resolve_cohort(snapshot: &TalentSnapshot, selection: &CohortSelection) -> Cohort {
    let ratings = snapshot.latest_ratings();
    let role_set = role_members(snapshot, &ratings, selection);

    if selection.manual_ids.is_empty() && role_set.is_empty() {
        return Cohort {
            source: CohortSource::Fallback,
            members: qualified(&ratings, selection.min_rating),
        };
    }

    let source = CohortSource::Explicit {
        manual: selection.manual_ids.len(),
        role: role_set.len(),
    };
    let mut members = selection.manual_ids.clone();
    members.extend(role_set);

    Cohort { source, members }
}

fn role_members(
    snapshot: &TalentSnapshot,
    ratings: &BTreeMap<EmployeeId, i32>,
    selection: &CohortSelection,
) -> BTreeSet<EmployeeId> {
    let Some(role_id) = selection.role_id else {
        return BTreeSet::new();
    };

    snapshot
        .employees
        .iter()
        .filter(|employee| employee.position_id == Some(role_id))
        .filter(|employee| {
            ratings
                .get(&employee.employee_id)
                .is_some_and(|rating| *rating >= selection.min_rating)
        })
        .map(|employee| employee.employee_id.clone())
        .collect()
}

fn qualified(ratings: &BTreeMap<EmployeeId, i32>, min_rating: i32) -> BTreeSet<EmployeeId> {
    ratings
        .iter()
        .filter(|(_, rating)| **rating >= min_rating)
        .map(|(id, _)| id.clone())
        .collect()
}
