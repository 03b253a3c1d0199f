use std::collections::BTreeMap;

use super::domain::{Baseline, BaselineValue, ReadingValue, VariableMatch, VariableReading};

/// Score every reading of one employee that has a baseline.
pub(crate) fn score_employee(
    readings: &[&VariableReading],
    baselines: &BTreeMap<String, Baseline>,
) -> Vec<VariableMatch> {
    readings
        .iter()
        .filter_map(|reading| {
            let baseline = baselines.get(&reading.variable)?;
            Some(VariableMatch {
                variable: reading.variable.clone(),
                family: baseline.family,
                rate: match_rate(&reading.value, baseline),
            })
        })
        .collect()
}

/// Family-specific match rate. `None` when the baseline is zero, either side
/// is not finite, or the reading and baseline disagree on value kind.
pub(crate) fn match_rate(value: &ReadingValue, baseline: &Baseline) -> Option<f64> {
    match (value, &baseline.value) {
        (ReadingValue::Numeric(user), BaselineValue::Numeric(base)) => {
            if *base == 0.0 || !base.is_finite() || !user.is_finite() {
                return None;
            }
            if baseline.reverse {
                Some((2.0 * base - user) / base * 100.0)
            } else {
                Some(user / base * 100.0)
            }
        }
        (ReadingValue::Category(user), BaselineValue::Category(base)) => {
            Some(if user == base { 100.0 } else { 0.0 })
        }
        _ => None,
    }
}
