use std::collections::BTreeMap;

use super::config::{VariableWeight, WeightConfig};
use super::domain::{GroupScore, VariableMatch};

/// Final score and per-group breakdown for one employee.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EmployeeRollup {
    pub(crate) final_score: Option<f64>,
    pub(crate) groups: Vec<GroupScore>,
}

/// Stage 1: weighted mean of defined variable match rates per group.
///
/// Undefined rates drop out of numerator and denominator alike. A group whose
/// contributing weights sum to zero has no match rate.
pub(crate) fn group_matches(
    matches: &[VariableMatch],
    index: &BTreeMap<&str, Vec<&VariableWeight>>,
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for entry in matches {
        let Some(rate) = entry.rate else {
            continue;
        };
        let Some(mappings) = index.get(entry.variable.as_str()) else {
            continue;
        };
        for mapping in mappings {
            let (numerator, denominator) = sums.entry(mapping.group.as_str()).or_default();
            *numerator += rate * mapping.weight;
            *denominator += mapping.weight;
        }
    }

    sums.into_iter()
        .filter(|(_, (_, denominator))| *denominator > 0.0)
        .map(|(group, (numerator, denominator))| (group.to_string(), numerator / denominator))
        .collect()
}

/// Stage 2: plain weighted sum of group match rates.
///
/// Not normalized: group weights that do not sum to 1, or missing groups,
/// move the score outside 0..=100.
pub(crate) fn final_score(groups: BTreeMap<String, f64>, weights: &WeightConfig) -> EmployeeRollup {
    let mut total = None;
    let mut breakdown = Vec::new();

    for (group, match_rate) in groups {
        let Some(weight) = weights.group_weight(&group) else {
            continue;
        };
        *total.get_or_insert(0.0) += match_rate * weight;
        breakdown.push(GroupScore {
            group,
            match_rate,
            weight,
        });
    }

    EmployeeRollup {
        final_score: total,
        groups: breakdown,
    }
}

pub(crate) fn rollup(
    matches: &[VariableMatch],
    index: &BTreeMap<&str, Vec<&VariableWeight>>,
    weights: &WeightConfig,
) -> EmployeeRollup {
    final_score(group_matches(matches, index), weights)
}
