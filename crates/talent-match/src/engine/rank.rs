use std::cmp::Ordering;

use super::domain::{EmployeeId, GroupScore, RankedMatch};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoredEmployee {
    pub(crate) employee_id: EmployeeId,
    pub(crate) full_name: String,
    pub(crate) final_score: f64,
    pub(crate) groups: Vec<GroupScore>,
}

/// Highest score first, ties by ascending employee id, cut to `limit`.
pub(crate) fn rank(mut scored: Vec<ScoredEmployee>, limit: usize) -> Vec<RankedMatch> {
    scored.sort_by(compare);
    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, employee)| RankedMatch {
            rank: index + 1,
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            final_score: employee.final_score,
            groups: employee.groups,
        })
        .collect()
}

fn compare(a: &ScoredEmployee, b: &ScoredEmployee) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.employee_id.cmp(&b.employee_id))
}
